//! Levels: shared layout plus the per-route mutable koopa and kiosk state.

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::geometry::{Position, Ticks};
use crate::rng::SlotRng;
use crate::state::{
    ArtifactId, CompletionCode, KOOPA_LEFT_MARGIN, Kiosk, Koopa, KoopaId, KoopaStatus, LevelId,
    Road, RoadId, StateError, TransitionRef,
};

/// Largest road count the completion code can record.
pub const MAX_LEVEL_ROADS: usize = 1 << 6;

/// Immutable geometry of a level, shared by reference across clones.
#[derive(Debug, PartialEq, Eq)]
pub struct LevelLayout {
    id: LevelId,
    start_pos: Position,
    roads: Vec<Road>,
    npc_slots: Vec<Position>,
    /// Start road plus every kiosk road, deduplicated.
    significant_roads: usize,
}

impl LevelLayout {
    pub const fn id(&self) -> LevelId {
        self.id
    }

    pub const fn start_position(&self) -> Position {
        self.start_pos
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    pub fn road(&self, id: RoadId) -> Option<&Road> {
        self.roads.get(id.index())
    }

    pub fn npc_slots(&self) -> &[Position] {
        &self.npc_slots
    }

    pub const fn significant_roads(&self) -> usize {
        self.significant_roads
    }
}

/// A level and the state that changes while it is played.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    layout: Arc<LevelLayout>,
    /// Sorted by artifact.
    kiosks: Vec<Kiosk>,
    /// Sorted by id.
    koopas: Vec<Koopa>,
    completed: bool,
    code: CompletionCode,
}

impl Level {
    /// Builds a level from its geometry and kiosks.
    ///
    /// Road ids must match their index and every road must be at least
    /// [`KOOPA_LEFT_MARGIN`] long. Transitions must start on the road that
    /// lists them. The start, NPC slots and kiosks must lie within an existing
    /// road.
    pub fn new(
        id: LevelId,
        start_pos: Position,
        mut roads: Vec<Road>,
        npc_slots: Vec<Position>,
        kiosks: Vec<Kiosk>,
    ) -> Result<Self, StateError> {
        if roads.len() > MAX_LEVEL_ROADS {
            return Err(StateError::TooManyRoads {
                level: id,
                count: roads.len(),
                max: MAX_LEVEL_ROADS,
            });
        }

        let mut reverse = Vec::new();
        for (index, road) in roads.iter().enumerate() {
            if road.id().index() != index {
                return Err(StateError::RoadIdMismatch {
                    index,
                    found: road.id(),
                });
            }
            if road.length() < KOOPA_LEFT_MARGIN {
                return Err(StateError::RoadTooShort {
                    level: id,
                    road: road.id(),
                    length: road.length(),
                });
            }
            for (t_index, transition) in road.transitions().iter().enumerate() {
                if transition.src().road != road.id() {
                    return Err(StateError::TransitionSourceMismatch {
                        road: road.id(),
                        index: t_index,
                        source_road: transition.src().road,
                    });
                }
                reverse.push((
                    transition.dest().road,
                    TransitionRef {
                        road: road.id(),
                        index: t_index,
                    },
                ));
            }
        }
        for (dest, reference) in reverse {
            if let Some(road) = roads.get_mut(dest.index()) {
                road.push_reverse_transition(reference);
            }
        }

        let check_on_road = |pos: &Position| -> Result<(), StateError> {
            let road = roads.get(pos.road.index()).ok_or(StateError::UnknownRoad {
                level: id,
                road: pos.road,
            })?;
            if (0..=road.length()).contains(&pos.x) {
                Ok(())
            } else {
                Err(StateError::PositionOffRoad {
                    pos: *pos,
                    length: road.length(),
                })
            }
        };
        for pos in npc_slots.iter().chain(core::iter::once(&start_pos)) {
            check_on_road(pos)?;
        }

        let mut kiosks = kiosks;
        kiosks.sort_by_key(Kiosk::artifact);
        let mut significant = HashSet::from([start_pos.road]);
        for (i, kiosk) in kiosks.iter().enumerate() {
            let artifact = kiosk.artifact();
            if artifact.index() >= GameConfig::NUM_ARTIFACTS {
                return Err(StateError::ArtifactOutOfRange(artifact));
            }
            if i > 0 && kiosks[i - 1].artifact() == artifact {
                return Err(StateError::DuplicateKiosk(artifact));
            }
            check_on_road(&kiosk.base_position())?;
            significant.insert(kiosk.base_position().road);
        }

        let layout = LevelLayout {
            id,
            start_pos,
            roads,
            npc_slots,
            significant_roads: significant.len(),
        };
        Ok(Self {
            layout: Arc::new(layout),
            kiosks,
            koopas: Vec::new(),
            completed: false,
            code: CompletionCode::default(),
        })
    }

    /// Places koopas directly, as found in a snapshot taken mid-level.
    ///
    /// Koopa road lengths are taken from the layout.
    pub fn with_koopas(mut self, koopas: Vec<Koopa>) -> Result<Self, StateError> {
        let mut placed: Vec<Koopa> = Vec::with_capacity(koopas.len());
        for koopa in koopas {
            let road = koopa.position().road;
            let length = self
                .layout
                .road(road)
                .ok_or(StateError::UnknownRoad {
                    level: self.id(),
                    road,
                })?
                .length();
            if placed.iter().any(|k| k.id() == koopa.id()) {
                return Err(StateError::DuplicateKoopa(koopa.id()));
            }
            if let Some(artifact) = koopa.artifact() {
                if artifact.index() >= GameConfig::NUM_ARTIFACTS {
                    return Err(StateError::ArtifactOutOfRange(artifact));
                }
                if placed.iter().any(|k| k.artifact() == Some(artifact)) {
                    return Err(StateError::DuplicateArtifactHolder(artifact));
                }
            }
            placed.push(koopa.with_road_length(length));
        }
        placed.sort_by_key(Koopa::id);
        self.koopas = placed;
        for koopa in &self.koopas {
            if let Some(artifact) = koopa.artifact() {
                self.code.set_koopa_status(artifact, koopa.status());
            }
        }
        Ok(self)
    }

    /// Marks kiosks as already completed, as found in a snapshot.
    pub fn with_completed_kiosks(
        mut self,
        artifacts: impl IntoIterator<Item = ArtifactId>,
    ) -> Result<Self, StateError> {
        for artifact in artifacts {
            self.set_kiosk_completed(artifact, true)?;
        }
        Ok(self)
    }

    /// Marks the level as completed, as found in a snapshot.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.set_completed(completed);
        self
    }

    pub fn id(&self) -> LevelId {
        self.layout.id
    }

    pub fn layout(&self) -> &Arc<LevelLayout> {
        &self.layout
    }

    pub fn start_position(&self) -> Position {
        self.layout.start_pos
    }

    pub fn road(&self, id: RoadId) -> Option<&Road> {
        self.layout.road(id)
    }

    pub fn roads(&self) -> &[Road] {
        &self.layout.roads
    }

    pub fn kiosks(&self) -> &[Kiosk] {
        &self.kiosks
    }

    pub fn kiosk(&self, artifact: ArtifactId) -> Option<&Kiosk> {
        self.kiosks.iter().find(|k| k.artifact() == artifact)
    }

    pub fn koopas(&self) -> &[Koopa] {
        &self.koopas
    }

    pub fn koopa(&self, id: KoopaId) -> Option<&Koopa> {
        self.koopas.iter().find(|k| k.id() == id)
    }

    /// Koopas carrying an artifact, in id order.
    pub fn artifact_holders(&self) -> impl Iterator<Item = &Koopa> {
        self.koopas.iter().filter(|k| k.has_artifact())
    }

    /// Artifact holders currently on `road`, in id order.
    pub fn artifact_holders_on_road(&self, road: RoadId) -> impl Iterator<Item = &Koopa> {
        self.artifact_holders().filter(move |k| k.position().road == road)
    }

    pub fn holder_of(&self, artifact: ArtifactId) -> Option<&Koopa> {
        self.koopas.iter().find(|k| k.artifact() == Some(artifact))
    }

    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    pub const fn completion_code(&self) -> CompletionCode {
        self.code
    }

    pub fn is_artifact_collected(&self, artifact: ArtifactId) -> bool {
        self.holder_of(artifact)
            .is_some_and(|k| k.status() == KoopaStatus::Carried)
    }

    pub fn is_artifact_returned(&self, artifact: ArtifactId) -> bool {
        self.kiosk(artifact).is_some_and(Kiosk::is_completed)
    }

    pub fn all_artifacts_returned(&self) -> bool {
        self.kiosks.iter().all(Kiosk::is_completed)
    }

    /// Records completion. The completed bit is only ever set, never cleared,
    /// outside of a respawn.
    pub(crate) fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        if completed {
            self.code.set_completed(true);
        }
    }

    pub(crate) fn set_koopa_status(
        &mut self,
        id: KoopaId,
        status: KoopaStatus,
    ) -> Result<(), StateError> {
        let koopa = self
            .koopas
            .iter_mut()
            .find(|k| k.id() == id)
            .ok_or(StateError::MissingKoopa(id))?;
        koopa.set_status(status);
        if let Some(artifact) = koopa.artifact() {
            self.code.set_koopa_status(artifact, status);
        }
        Ok(())
    }

    pub(crate) fn set_kiosk_completed(
        &mut self,
        artifact: ArtifactId,
        completed: bool,
    ) -> Result<(), StateError> {
        let kiosk = self
            .kiosks
            .iter_mut()
            .find(|k| k.artifact() == artifact)
            .ok_or(StateError::MissingKiosk(artifact))?;
        kiosk.set_completed(completed);
        self.code.set_kiosk_completed(artifact, completed);
        Ok(())
    }

    pub(crate) fn code_mut(&mut self) -> &mut CompletionCode {
        &mut self.code
    }

    /// Re-rolls every koopa the way the game does on level entry.
    ///
    /// Consumes slot draws for the NPCs and the non-interactive koopas that
    /// are not modelled, then places the three artifact holders. Clears kiosk
    /// progress and the completion code.
    pub fn respawn(&mut self, rng: &mut SlotRng) -> Result<(), StateError> {
        let slots = &self.layout.npc_slots;
        let count = NonZeroU32::new(slots.len() as u32)
            .filter(|n| n.get() as usize >= GameConfig::MIN_NPC_SLOTS)
            .ok_or(StateError::InsufficientSlots {
                level: self.id(),
                slots: slots.len(),
                required: GameConfig::MIN_NPC_SLOTS,
            })?;
        let slot_roads = slots.iter().map(|p| p.road).collect::<HashSet<_>>().len();
        if slot_roads < GameConfig::NUM_NPCS {
            return Err(StateError::InsufficientSlotRoads {
                level: self.id(),
                roads: slot_roads,
                required: GameConfig::NUM_NPCS,
            });
        }

        let mut occupied = HashSet::new();
        let mut npc_roads = HashSet::new();
        for _ in 0..GameConfig::NUM_NPCS {
            // NPCs also refuse roads that already have an NPC.
            loop {
                let slot = rng.advance_in_level(count) as usize;
                let road = slots[slot].road;
                if !occupied.contains(&slot) && !npc_roads.contains(&road) {
                    occupied.insert(slot);
                    npc_roads.insert(road);
                    break;
                }
            }
        }
        let mut next_koopa_slot = |rng: &mut SlotRng| loop {
            let slot = rng.advance_in_level(count) as usize;
            if occupied.insert(slot) {
                break slot;
            }
        };
        for _ in 0..GameConfig::NUM_USELESS_KOOPAS {
            next_koopa_slot(rng);
        }

        let mut holders = ArrayVec::<Koopa, { GameConfig::NUM_ARTIFACTS }>::new();
        for (i, animation_time) in GameConfig::ANIMATION_TIMES.iter().copied().enumerate() {
            let pos = slots[next_koopa_slot(rng)];
            let length = self
                .layout
                .road(pos.road)
                .ok_or(StateError::UnknownRoad {
                    level: self.id(),
                    road: pos.road,
                })?
                .length();
            let id = KoopaId((GameConfig::NUM_NPCS + GameConfig::NUM_USELESS_KOOPAS + i) as u16);
            holders.push(Koopa::new(id, pos, length).with_artifact(ArtifactId(i as u8), animation_time));
        }
        self.koopas = holders.into_iter().collect();

        for kiosk in &mut self.kiosks {
            kiosk.set_completed(false);
        }
        self.completed = false;
        self.code = CompletionCode::default();
        Ok(())
    }

    pub fn advance_npcs(&mut self, time: Ticks) {
        for koopa in &mut self.koopas {
            koopa.advance(time);
        }
    }

    /// True when completion, kiosk progress and every koopa match.
    pub fn same_state(&self, other: &Self) -> bool {
        self.completed == other.completed
            && self.kiosks.len() == other.kiosks.len()
            && self
                .kiosks
                .iter()
                .zip(&other.kiosks)
                .all(|(a, b)| a.is_completed() == b.is_completed())
            && self.koopas.len() == other.koopas.len()
            && self
                .koopas
                .iter()
                .zip(&other.koopas)
                .all(|(a, b)| a.same_state(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorSeverity, GameError};

    const ROAD_LENGTH: i32 = 1200;

    fn at(road: u16, x: i32) -> Position {
        Position::new(false, RoadId(road), x)
    }

    fn roads(count: u16) -> Vec<Road> {
        (0..count).map(|id| Road::new(RoadId(id), ROAD_LENGTH, Vec::new())).collect()
    }

    fn slots(count: i32) -> Vec<Position> {
        (0..count).map(|i| at((i % 5) as u16, 100 + 40 * i)).collect()
    }

    fn level() -> Level {
        Level::new(
            LevelId(1),
            at(0, 50),
            roads(5),
            slots(24),
            vec![Kiosk::new(ArtifactId(0), at(0, 700))],
        )
        .expect("valid level")
    }

    #[test]
    fn respawn_places_artifact_holders_from_reference_draws() {
        let mut level = level();
        let mut rng = SlotRng::new();
        level.respawn(&mut rng).expect("respawn");

        let holders: Vec<_> = level
            .artifact_holders()
            .map(|k| (k.id(), k.artifact(), k.position(), k.animation_time()))
            .collect();
        assert_eq!(
            holders,
            vec![
                (KoopaId(18), Some(ArtifactId(0)), at(3, 420), 80),
                (KoopaId(19), Some(ArtifactId(1)), at(0, 900), 48),
                (KoopaId(20), Some(ArtifactId(2)), at(2, 780), 152),
            ]
        );
        assert_eq!(rng.registers(), (41617, 37888));
        assert_eq!(level.completion_code(), CompletionCode::default());
    }

    #[test]
    fn respawn_resets_progress() {
        let mut level = level();
        let mut rng = SlotRng::new();
        level.respawn(&mut rng).expect("respawn");
        level.set_koopa_status(KoopaId(18), KoopaStatus::Carried).expect("koopa");
        level.set_kiosk_completed(ArtifactId(0), true).expect("kiosk");
        level.set_completed(true);
        assert!(level.completion_code().is_completed());

        level.respawn(&mut rng).expect("respawn");
        assert!(!level.is_completed());
        assert!(!level.is_artifact_returned(ArtifactId(0)));
        assert!(level.artifact_holders().all(Koopa::is_active));
        assert_eq!(level.completion_code(), CompletionCode::default());
    }

    #[test]
    fn respawn_requires_enough_slots_and_roads() {
        let mut short = Level::new(LevelId(2), at(0, 50), roads(5), slots(20), Vec::new())
            .expect("valid level");
        assert!(matches!(
            short.respawn(&mut SlotRng::new()),
            Err(StateError::InsufficientSlots { slots: 20, .. })
        ));

        let narrow_slots = (0..24).map(|i| at((i % 4) as u16, 100 + 40 * i)).collect();
        let mut narrow = Level::new(LevelId(3), at(0, 50), roads(5), narrow_slots, Vec::new())
            .expect("valid level");
        assert!(matches!(
            narrow.respawn(&mut SlotRng::new()),
            Err(StateError::InsufficientSlotRoads { roads: 4, .. })
        ));
    }

    #[test]
    fn construction_builds_reverse_index_and_significant_roads() {
        let mut roads = roads(3);
        roads[0] = Road::new(
            RoadId(0),
            ROAD_LENGTH,
            vec![crate::state::Transition::pipe(at(0, 200), at(2, 60))],
        );
        let level = Level::new(
            LevelId(1),
            at(0, 50),
            roads,
            Vec::new(),
            vec![
                Kiosk::new(ArtifactId(1), at(2, 700)),
                Kiosk::new(ArtifactId(0), at(0, 700)),
            ],
        )
        .expect("valid level");

        assert_eq!(
            level.road(RoadId(2)).map(Road::reverse_transitions),
            Some(&[TransitionRef { road: RoadId(0), index: 0 }][..])
        );
        assert_eq!(level.layout().significant_roads(), 2);
        assert_eq!(level.kiosks()[0].artifact(), ArtifactId(0));
    }

    #[test]
    fn construction_rejects_inconsistent_geometry() {
        let mut swapped = roads(2);
        swapped.swap(0, 1);
        assert!(matches!(
            Level::new(LevelId(1), at(0, 50), swapped, Vec::new(), Vec::new()),
            Err(StateError::RoadIdMismatch { index: 0, .. })
        ));

        let kiosks = vec![
            Kiosk::new(ArtifactId(0), at(0, 700)),
            Kiosk::new(ArtifactId(0), at(1, 700)),
        ];
        assert!(matches!(
            Level::new(LevelId(1), at(0, 50), roads(2), Vec::new(), kiosks),
            Err(StateError::DuplicateKiosk(ArtifactId(0)))
        ));
    }

    #[test]
    fn construction_rejects_roads_shorter_than_koopa_margin() {
        let mut short = roads(2);
        short[1] = Road::new(RoadId(1), 10, Vec::new());
        let err = Level::new(LevelId(4), at(0, 50), short, Vec::new(), Vec::new()).unwrap_err();
        assert_eq!(
            err,
            StateError::RoadTooShort {
                level: LevelId(4),
                road: RoadId(1),
                length: 10
            }
        );
        assert_eq!(err.severity(), ErrorSeverity::Validation);

        let mut exact = roads(2);
        exact[1] = Road::new(RoadId(1), KOOPA_LEFT_MARGIN, Vec::new());
        assert!(Level::new(LevelId(4), at(0, 50), exact, Vec::new(), Vec::new()).is_ok());
    }

    #[test]
    fn construction_rejects_positions_off_their_road() {
        let off_road = |pos: Position| StateError::PositionOffRoad {
            pos,
            length: ROAD_LENGTH,
        };

        assert_eq!(
            Level::new(LevelId(1), at(0, -1), roads(2), Vec::new(), Vec::new()),
            Err(off_road(at(0, -1)))
        );
        assert_eq!(
            Level::new(LevelId(1), at(0, 50), roads(2), vec![at(1, 1201)], Vec::new()),
            Err(off_road(at(1, 1201)))
        );
        let kiosks = vec![Kiosk::new(ArtifactId(0), at(1, 5000))];
        let err = Level::new(LevelId(1), at(0, 50), roads(2), Vec::new(), kiosks).unwrap_err();
        assert_eq!(err, off_road(at(1, 5000)));
        assert_eq!(err.severity(), ErrorSeverity::Validation);

        let edges = vec![at(0, 0), at(1, ROAD_LENGTH)];
        assert!(Level::new(LevelId(1), at(0, 0), roads(2), edges, Vec::new()).is_ok());
    }

    #[test]
    fn koopa_status_updates_completion_code_for_holders_only() {
        let plain = Koopa::new(KoopaId(3), at(1, 300), 0);
        let holder = Koopa::new(KoopaId(19), at(1, 400), 0).with_artifact(ArtifactId(1), 48);
        let mut level = level().with_koopas(vec![holder, plain]).expect("koopas");
        assert_eq!(level.koopa(KoopaId(19)).map(Koopa::road_length), Some(ROAD_LENGTH));

        level.set_koopa_status(KoopaId(3), KoopaStatus::Stomped).expect("koopa");
        assert_eq!(level.completion_code().bits(), 0);
        level.set_koopa_status(KoopaId(19), KoopaStatus::Stomped).expect("koopa");
        assert_eq!(level.completion_code().bits(), 1 << 2);
        assert_eq!(
            level.set_koopa_status(KoopaId(7), KoopaStatus::Stomped),
            Err(StateError::MissingKoopa(KoopaId(7)))
        );
    }
}
