//! Packed summary of every mutable fact about a level.

use core::fmt;

use crate::state::{ArtifactId, KoopaStatus, RoadId};

const KOOPA_STATUS_WIDTH: u32 = 2;
const HELD_ARTIFACT_OFFSET: u32 = 12;
const HELD_ARTIFACT_WIDTH: u32 = 2;
const KIOSK_OFFSET: u32 = 16;
const MOUNT_OFFSET: u32 = 20;
const COMPLETED_OFFSET: u32 = 21;
const ROAD_OFFSET: u32 = 24;
const ROAD_WIDTH: u32 = 6;

const fn mask(width: u32) -> u32 {
    (1 << width) - 1
}

/// Bit-packed level summary used for constant-time state comparison.
///
/// | bits | meaning |
/// |---|---|
/// | `2a..2a+2` | status of the koopa holding artifact `a` |
/// | `12..14` | artifact the player is holding |
/// | `16 + a` | kiosk `a` completed |
/// | `20` | player has the mount |
/// | `21` | level completed |
/// | `24..30` | player road |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CompletionCode(u32);

impl CompletionCode {
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn set_koopa_status(&mut self, artifact: ArtifactId, status: KoopaStatus) {
        let offset = KOOPA_STATUS_WIDTH * u32::from(artifact.0);
        self.replace(offset, KOOPA_STATUS_WIDTH, status.code());
    }

    pub fn set_held_artifact(&mut self, artifact: ArtifactId) {
        self.replace(HELD_ARTIFACT_OFFSET, HELD_ARTIFACT_WIDTH, u32::from(artifact.0));
    }

    pub fn set_kiosk_completed(&mut self, artifact: ArtifactId, completed: bool) {
        self.set_bit(KIOSK_OFFSET + u32::from(artifact.0), completed);
    }

    pub fn set_mount(&mut self, mounted: bool) {
        self.set_bit(MOUNT_OFFSET, mounted);
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.set_bit(COMPLETED_OFFSET, completed);
    }

    pub fn set_player_road(&mut self, road: RoadId) {
        self.replace(ROAD_OFFSET, ROAD_WIDTH, u32::from(road.0));
    }

    pub const fn is_completed(self) -> bool {
        self.0 & (1 << COMPLETED_OFFSET) != 0
    }

    fn replace(&mut self, offset: u32, width: u32, value: u32) {
        self.0 &= !(mask(width) << offset);
        self.0 |= (value & mask(width)) << offset;
    }

    fn set_bit(&mut self, offset: u32, value: bool) {
        if value {
            self.0 |= 1 << offset;
        } else {
            self.0 &= !(1 << offset);
        }
    }
}

impl fmt::Display for CompletionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_pack_into_documented_bits() {
        let mut code = CompletionCode::default();
        code.set_koopa_status(ArtifactId(2), KoopaStatus::Carried);
        code.set_held_artifact(ArtifactId(1));
        code.set_kiosk_completed(ArtifactId(0), true);
        code.set_mount(true);
        code.set_player_road(RoadId(5));
        assert_eq!(code.bits(), (2 << 4) | (1 << 12) | (1 << 16) | (1 << 20) | (5 << 24));
        assert!(!code.is_completed());

        code.set_completed(true);
        assert!(code.is_completed());
    }

    #[test]
    fn setters_overwrite_previous_values() {
        let mut code = CompletionCode::default();
        code.set_koopa_status(ArtifactId(1), KoopaStatus::Carried);
        code.set_koopa_status(ArtifactId(1), KoopaStatus::Stomped);
        code.set_player_road(RoadId(7));
        code.set_player_road(RoadId(3));
        code.set_mount(true);
        code.set_mount(false);
        assert_eq!(code.bits(), (1 << 2) | (3 << 24));
    }
}
