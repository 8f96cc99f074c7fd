//! Players and tournaments, cross-registered through bitmaps.

use super::entity::Medal;
use super::entity_list::{EntityKind, EntityList};
use super::error::ListError;

/// Full olympiad state: one players list and one tournaments list.
///
/// Registration always touches both sides: the player's bitmap gets the
/// tournament's bit and the tournament's bitmap gets the player's bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Olympiad {
    pub players: EntityList,
    pub tournaments: EntityList,
}

impl Olympiad {
    /// Both lists with the same capacity.
    pub fn new(capacity: u32) -> Result<Self, ListError> {
        Ok(Self {
            players: EntityList::new(EntityKind::Player, capacity)?,
            tournaments: EntityList::new(EntityKind::Tournament, capacity)?,
        })
    }

    pub fn from_lists(players: EntityList, tournaments: EntityList) -> Self {
        Self { players, tournaments }
    }

    pub fn player_count(&self) -> usize {
        self.players.count()
    }

    pub fn tournament_count(&self) -> usize {
        self.tournaments.count()
    }

    pub fn add_player(&mut self, name: &str) -> Result<u32, ListError> {
        self.players.add(name)
    }

    pub fn add_tournament(&mut self, name: &str) -> Result<u32, ListError> {
        self.tournaments.add(name)
    }

    pub fn register(&mut self, player: &str, tournament: &str) -> Result<(), ListError> {
        let (p, t) = self.resolve(player, tournament)?;
        self.set_registration(p, t, true)
    }

    pub fn unregister(&mut self, player: &str, tournament: &str) -> Result<(), ListError> {
        let (p, t) = self.resolve(player, tournament)?;
        self.set_registration(p, t, false)
    }

    /// Set or clear the pair of bits linking two active entities.
    pub fn set_registration(
        &mut self,
        player: u32,
        tournament: u32,
        registered: bool,
    ) -> Result<(), ListError> {
        if !self.tournaments.is_active(tournament) {
            return Err(ListError::InvalidIndex { kind: EntityKind::Tournament, index: tournament });
        }
        let p = self
            .players
            .get_mut(player)
            .ok_or(ListError::InvalidIndex { kind: EntityKind::Player, index: player })?;
        if registered {
            p.registrations.insert(tournament);
        } else {
            p.registrations.remove(tournament);
        }

        if let Some(t) = self.tournaments.get_mut(tournament) {
            if registered {
                t.registrations.insert(player);
            } else {
                t.registrations.remove(player);
            }
        }
        Ok(())
    }

    pub fn is_registered(&self, player: &str, tournament: &str) -> bool {
        match (self.players.find(player), self.tournaments.find(tournament)) {
            (Some(p), Some(t)) => self
                .players
                .slot(p)
                .is_some_and(|entity| entity.registrations.contains(t)),
            _ => false,
        }
    }

    /// Names of the tournaments a player is registered to, or of the
    /// players registered to a tournament.
    pub fn registered_names(&self, kind: EntityKind, name: &str) -> Result<Vec<String>, ListError> {
        let (own, other) = self.pair(kind);
        let index = own.find_by_name(name)?;
        let entity = own
            .slot(index)
            .ok_or(ListError::InvalidIndex { kind, index })?;
        Ok(entity
            .registrations
            .iter()
            .filter_map(|i| other.get(i).map(|e| e.name.clone()))
            .collect())
    }

    pub fn remove_player(&mut self, name: &str) -> Result<(), ListError> {
        let index = self.players.find_by_name(name)?;
        Self::remove_cascading(&mut self.players, &mut self.tournaments, index)
    }

    pub fn remove_tournament(&mut self, name: &str) -> Result<(), ListError> {
        let index = self.tournaments.find_by_name(name)?;
        Self::remove_cascading(&mut self.tournaments, &mut self.players, index)
    }

    /// Clear the removed entity's bit from every companion, then free it.
    fn remove_cascading(
        own: &mut EntityList,
        other: &mut EntityList,
        index: u32,
    ) -> Result<(), ListError> {
        let registrations = own
            .get(index)
            .ok_or(ListError::InvalidIndex { kind: own.kind(), index })?
            .registrations;
        for companion in registrations.iter() {
            if let Some(entity) = other.get_mut(companion) {
                entity.registrations.remove(index);
            }
        }
        own.release(index)
    }

    pub fn rename(&mut self, kind: EntityKind, old: &str, new: &str) -> Result<(), ListError> {
        let list = match kind {
            EntityKind::Player => &mut self.players,
            EntityKind::Tournament => &mut self.tournaments,
        };
        let index = list.find_by_name(old)?;
        list.rename(index, new)
    }

    /// Record a medalist: the tournament's medal slot holds the player index.
    pub fn assign_medal(
        &mut self,
        player: &str,
        tournament: &str,
        medal: Medal,
    ) -> Result<(), ListError> {
        let (p, t) = self.resolve(player, tournament)?;
        let entity = self
            .tournaments
            .get_mut(t)
            .ok_or(ListError::InvalidIndex { kind: EntityKind::Tournament, index: t })?;
        entity.medals[medal as usize] = p as u8;
        Ok(())
    }

    /// Check both lists, then that every registration bit has its mirror.
    pub fn verify(&self) -> Result<(), ListError> {
        self.players.verify()?;
        self.tournaments.verify()?;
        self.check_registration_symmetry()
    }

    pub fn check_registration_symmetry(&self) -> Result<(), ListError> {
        check_registration_symmetry(&self.players, &self.tournaments)
    }

    fn resolve(&self, player: &str, tournament: &str) -> Result<(u32, u32), ListError> {
        Ok((self.players.find_by_name(player)?, self.tournaments.find_by_name(tournament)?))
    }

    fn pair(&self, kind: EntityKind) -> (&EntityList, &EntityList) {
        match kind {
            EntityKind::Player => (&self.players, &self.tournaments),
            EntityKind::Tournament => (&self.tournaments, &self.players),
        }
    }
}

/// Every bit set on either side must have its mirror on the other.
pub fn check_registration_symmetry(
    players: &EntityList,
    tournaments: &EntityList,
) -> Result<(), ListError> {
    for (own, other) in [(players, tournaments), (tournaments, players)] {
        for index in own.iter_active() {
            let Some(entity) = own.slot(index) else { continue };
            for companion in entity.registrations.iter() {
                let mirrored = other
                    .get(companion)
                    .is_some_and(|c| c.registrations.contains(index));
                if !mirrored {
                    return Err(ListError::Corruption {
                        kind: own.kind(),
                        reason: format!(
                            "{} '{}' ({}) links {} {} without a matching bit",
                            own.kind(),
                            entity.name,
                            index,
                            other.kind(),
                            companion
                        ),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registrations;
    use crate::MAX_NUM_ENTITIES;

    fn reference() -> Olympiad {
        let mut o = Olympiad::new(MAX_NUM_ENTITIES).unwrap();
        for name in ["Alice", "Bob", "Charlie"] {
            o.add_player(name).unwrap();
        }
        for name in ["Tennis", "Chess"] {
            o.add_tournament(name).unwrap();
        }
        o.register("Alice", "Tennis").unwrap();
        o.register("Alice", "Chess").unwrap();
        o.register("Bob", "Tennis").unwrap();
        o.register("Charlie", "Chess").unwrap();
        o
    }

    fn bitmap(list: &EntityList, name: &str) -> u64 {
        let index = list.find_by_name(name).unwrap();
        list.get(index).unwrap().registrations.bits()
    }

    #[test]
    fn test_reference_bitmaps() {
        let o = reference();
        assert_eq!(bitmap(&o.players, "Alice"), 0b11);
        assert_eq!(bitmap(&o.players, "Bob"), 0b01);
        assert_eq!(bitmap(&o.players, "Charlie"), 0b10);
        assert_eq!(bitmap(&o.tournaments, "Tennis"), 0b011);
        assert_eq!(bitmap(&o.tournaments, "Chess"), 0b101);
        assert!(o.verify().is_ok());
    }

    #[test]
    fn test_registered_names() {
        let o = reference();
        assert_eq!(
            o.registered_names(EntityKind::Player, "Alice").unwrap(),
            vec!["Tennis".to_string(), "Chess".to_string()]
        );
        assert_eq!(
            o.registered_names(EntityKind::Tournament, "Chess").unwrap(),
            vec!["Alice".to_string(), "Charlie".to_string()]
        );
        assert!(o.is_registered("Bob", "Tennis"));
        assert!(!o.is_registered("Bob", "Chess"));
    }

    #[test]
    fn test_unregister_clears_both_sides() {
        let mut o = reference();
        o.unregister("Alice", "Tennis").unwrap();
        assert_eq!(bitmap(&o.players, "Alice"), 0b10);
        assert_eq!(bitmap(&o.tournaments, "Tennis"), 0b010);
        assert!(o.verify().is_ok());
    }

    #[test]
    fn test_remove_player_cascades() {
        let mut o = reference();
        o.remove_player("Alice").unwrap();

        assert_eq!(bitmap(&o.tournaments, "Tennis"), 0b010);
        assert_eq!(bitmap(&o.tournaments, "Chess"), 0b100);
        assert_eq!(o.player_count(), 2);
        assert_eq!(o.players.first_free(), 1);
        assert!(o.verify().is_ok());
        assert!(matches!(o.remove_player("Alice"), Err(ListError::NotFound { .. })));
    }

    #[test]
    fn test_remove_tournament_cascades() {
        let mut o = reference();
        o.remove_tournament("Chess").unwrap();
        assert_eq!(bitmap(&o.players, "Alice"), 0b01);
        assert_eq!(bitmap(&o.players, "Charlie"), 0);
        assert!(o.verify().is_ok());
    }

    #[test]
    fn test_asymmetric_bitmap_is_corruption() {
        let mut o = reference();
        let bob = o.players.find("Bob").unwrap();
        o.players.get_mut(bob).unwrap().registrations = Registrations(0b11);

        assert!(o.players.verify().is_ok());
        assert!(matches!(o.verify(), Err(ListError::Corruption { kind: EntityKind::Player, .. })));
    }

    #[test]
    fn test_assign_medal_and_rename() {
        let mut o = reference();
        o.assign_medal("Charlie", "Chess", Medal::Gold).unwrap();
        o.assign_medal("Alice", "Chess", Medal::Silver).unwrap();
        let chess = o.tournaments.find("Chess").unwrap();
        assert_eq!(o.tournaments.get(chess).unwrap().medals, [3, 1, 0]);

        o.rename(EntityKind::Player, "Bob", "Roberto").unwrap();
        assert!(o.is_registered("Roberto", "Tennis"));
        assert!(matches!(
            o.rename(EntityKind::Player, "Roberto", "Alice"),
            Err(ListError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_register_unknown_names() {
        let mut o = reference();
        assert!(matches!(
            o.register("Dora", "Tennis"),
            Err(ListError::NotFound { kind: EntityKind::Player, .. })
        ));
        assert!(matches!(
            o.register("Alice", "Golf"),
            Err(ListError::NotFound { kind: EntityKind::Tournament, .. })
        ));
    }
}
