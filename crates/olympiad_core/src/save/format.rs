use super::error::SaveError;
use super::{SAVE_MAGIC, SAVE_VERSION};
use crate::codec::{ByteReader, ByteWriter};
use crate::layout::{min_file_size, HEADER_SIZE};
use crate::registry::{Entity, EntityKind, EntityList, ListError, Olympiad};
use crate::MAX_NUM_ENTITIES;

/// Fixed 24-byte file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveHeader {
    pub magic: u32,
    pub version: u32,
    pub players_capacity: u32,
    pub players_first_free: u32,
    pub tournaments_capacity: u32,
    pub tournaments_first_free: u32,
}

impl SaveHeader {
    fn for_lists(players: &EntityList, tournaments: &EntityList) -> Self {
        Self {
            magic: SAVE_MAGIC,
            version: SAVE_VERSION,
            players_capacity: players.capacity(),
            players_first_free: players.first_free(),
            tournaments_capacity: tournaments.capacity(),
            tournaments_first_free: tournaments.first_free(),
        }
    }

    fn write(&self, buf: &mut Vec<u8>) {
        let mut w = ByteWriter::new(buf);
        w.put_u32(self.magic);
        w.put_u32(self.version);
        w.put_u32(self.players_capacity);
        w.put_u32(self.players_first_free);
        w.put_u32(self.tournaments_capacity);
        w.put_u32(self.tournaments_first_free);
    }

    /// Parse and validate the header. Nothing past it is read, so a
    /// foreign or newer file is rejected before any list data is trusted.
    pub fn read(data: &[u8]) -> Result<Self, SaveError> {
        if data.len() < HEADER_SIZE {
            return Err(SaveError::Truncated { needed: HEADER_SIZE, available: data.len() });
        }

        let mut r = ByteReader::new(&data[..HEADER_SIZE]);
        let magic = r.get_u32()?;
        if magic != SAVE_MAGIC {
            return Err(SaveError::Format { field: "magic", expected: SAVE_MAGIC, found: magic });
        }
        let version = r.get_u32()?;
        if version != SAVE_VERSION {
            return Err(SaveError::Format {
                field: "version",
                expected: SAVE_VERSION,
                found: version,
            });
        }

        let header = Self {
            magic,
            version,
            players_capacity: r.get_u32()?,
            players_first_free: r.get_u32()?,
            tournaments_capacity: r.get_u32()?,
            tournaments_first_free: r.get_u32()?,
        };

        for capacity in [header.players_capacity, header.tournaments_capacity] {
            if capacity > MAX_NUM_ENTITIES {
                return Err(ListError::InvalidCapacity { capacity, max: MAX_NUM_ENTITIES }.into());
            }
        }
        Ok(header)
    }
}

/// In-memory image of a save file: both lists exactly as stored,
/// sentinels and free slots included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFile {
    pub players: EntityList,
    pub tournaments: EntityList,
}

impl SaveFile {
    pub fn new(players: EntityList, tournaments: EntityList) -> Self {
        Self { players, tournaments }
    }

    pub fn from_olympiad(olympiad: &Olympiad) -> Self {
        Self::new(olympiad.players.clone(), olympiad.tournaments.clone())
    }

    pub fn into_olympiad(self) -> Olympiad {
        Olympiad::from_lists(self.players, self.tournaments)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SaveError> {
        Self::encode(&self.players, &self.tournaments)
    }

    /// Header, then every players slot, then every tournaments slot, each
    /// list in array order. Output depends only on the lists.
    pub fn encode(players: &EntityList, tournaments: &EntityList) -> Result<Vec<u8>, SaveError> {
        let size = HEADER_SIZE
            + players.slots().iter().map(Entity::encoded_len).sum::<usize>()
            + tournaments.slots().iter().map(Entity::encoded_len).sum::<usize>();
        let mut buf = Vec::with_capacity(size);

        SaveHeader::for_lists(players, tournaments).write(&mut buf);
        for entity in players.slots().iter().chain(tournaments.slots()) {
            entity.encode(&mut buf)?;
        }

        debug_assert_eq!(buf.len(), size);
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, SaveError> {
        let header = SaveHeader::read(data)?;

        let needed = min_file_size(header.players_capacity, header.tournaments_capacity);
        if data.len() < needed {
            return Err(SaveError::Truncated { needed, available: data.len() });
        }

        let mut r = ByteReader::new(data);
        r.take(HEADER_SIZE)?;

        let players = Self::decode_list(
            &mut r,
            EntityKind::Player,
            header.players_capacity,
            header.players_first_free,
        )?;
        let tournaments = Self::decode_list(
            &mut r,
            EntityKind::Tournament,
            header.tournaments_capacity,
            header.tournaments_first_free,
        )?;

        if r.remaining() != 0 {
            return Err(SaveError::Corruption(format!(
                "{} unexpected bytes after the last record",
                r.remaining()
            )));
        }

        Ok(Self { players, tournaments })
    }

    fn decode_list(
        r: &mut ByteReader<'_>,
        kind: EntityKind,
        capacity: u32,
        first_free: u32,
    ) -> Result<EntityList, SaveError> {
        let slots = (0..capacity + 2)
            .map(|_| Entity::decode(r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EntityList::from_raw_parts(kind, capacity, first_free, slots)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use crate::layout::ENTITY_FIXED_SIZE;
    use crate::registry::{Medal, Phase};
    use proptest::prelude::*;

    fn reference() -> Olympiad {
        let mut olympiad = Olympiad::new(MAX_NUM_ENTITIES).unwrap();
        for name in ["Alice", "Bob", "Charlie"] {
            olympiad.add_player(name).unwrap();
        }
        for name in ["Tennis", "Chess"] {
            olympiad.add_tournament(name).unwrap();
        }
        olympiad.register("Alice", "Tennis").unwrap();
        olympiad.register("Alice", "Chess").unwrap();
        olympiad.register("Bob", "Tennis").unwrap();
        olympiad.register("Charlie", "Chess").unwrap();
        olympiad
    }

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_header_fields() {
        let bytes = SaveFile::from_olympiad(&reference()).to_bytes().unwrap();
        assert_eq!(&bytes[0..4], b"INNE");
        assert_eq!(u32_at(&bytes, 0), SAVE_MAGIC);
        assert_eq!(u32_at(&bytes, 4), SAVE_VERSION);
        assert_eq!(u32_at(&bytes, 8), 64);
        assert_eq!(u32_at(&bytes, 12), 4);
        assert_eq!(u32_at(&bytes, 16), 64);
        assert_eq!(u32_at(&bytes, 20), 3);
        // head sentinel of the players list points at the first player
        assert_eq!(u32_at(&bytes, HEADER_SIZE), 1);
        assert_eq!(u32_at(&bytes, HEADER_SIZE + 4), 0);
    }

    #[test]
    fn test_reference_size() {
        let bytes = SaveFile::from_olympiad(&reference()).to_bytes().unwrap();
        let names = "AliceBobCharlieTennisChess".len();
        assert_eq!(bytes.len(), HEADER_SIZE + 132 * ENTITY_FIXED_SIZE + names);
        assert_eq!(bytes.len(), 1_153_202);
    }

    #[test]
    fn test_roundtrip_keeps_sentinels_and_free_chain() {
        let mut olympiad = reference();
        olympiad.remove_player("Bob").unwrap();
        olympiad.add_player("Dora").unwrap();
        olympiad.remove_tournament("Tennis").unwrap();

        let file = SaveFile::from_olympiad(&olympiad);
        let loaded = SaveFile::from_bytes(&file.to_bytes().unwrap()).unwrap();

        assert_eq!(loaded, file);
        let players = &loaded.players;
        assert_eq!(players.iter_active().collect::<Vec<_>>(), vec![1, 3, 2]);
        assert_eq!(players.slot(players.tail()).unwrap().prev, 2);
        assert!(loaded.into_olympiad().verify().is_ok());
    }

    #[test]
    fn test_empty_lists_roundtrip() {
        let players = EntityList::new(EntityKind::Player, 0).unwrap();
        let tournaments = EntityList::new(EntityKind::Tournament, 2).unwrap();
        let file = SaveFile::new(players, tournaments);

        let bytes = file.to_bytes().unwrap();
        assert_eq!(bytes.len(), min_file_size(0, 2));
        assert_eq!(SaveFile::from_bytes(&bytes).unwrap(), file);
    }

    #[test]
    fn test_any_magic_byte_flip_is_rejected() {
        let bytes = SaveFile::from_olympiad(&reference()).to_bytes().unwrap();
        for i in 0..4 {
            let mut corrupt = bytes.clone();
            corrupt[i] ^= 0xFF;
            assert!(matches!(
                SaveFile::from_bytes(&corrupt),
                Err(SaveError::Format { field: "magic", .. })
            ));
        }
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let mut bytes = SaveFile::from_olympiad(&reference()).to_bytes().unwrap();
        bytes[4..8].copy_from_slice(&1u32.to_le_bytes());
        match SaveFile::from_bytes(&bytes) {
            Err(SaveError::Format { field, expected, found }) => {
                assert_eq!(field, "version");
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, 1);
            }
            other => panic!("expected version error, got {:?}", other),
        }
    }

    #[test]
    fn test_header_checked_before_list_data() {
        // valid header, no list data at all
        let bytes = SaveFile::from_olympiad(&reference()).to_bytes().unwrap();
        let mut short = bytes[..HEADER_SIZE].to_vec();
        assert!(matches!(
            SaveFile::from_bytes(&short),
            Err(SaveError::Truncated { needed, .. }) if needed == min_file_size(64, 64)
        ));

        short[0] = 0;
        assert!(matches!(SaveFile::from_bytes(&short), Err(SaveError::Format { .. })));
        assert!(matches!(
            SaveFile::from_bytes(&bytes[..10]),
            Err(SaveError::Truncated { needed: HEADER_SIZE, available: 10 })
        ));
    }

    #[test]
    fn test_oversized_capacity_in_header() {
        let mut bytes = SaveFile::from_olympiad(&reference()).to_bytes().unwrap();
        bytes[16..20].copy_from_slice(&65u32.to_le_bytes());
        assert!(matches!(
            SaveFile::from_bytes(&bytes),
            Err(SaveError::List(ListError::InvalidCapacity { capacity: 65, .. }))
        ));
    }

    #[test]
    fn test_malformed_name_aborts_load() {
        let mut bytes = SaveFile::from_olympiad(&reference()).to_bytes().unwrap();
        // name length of the players head sentinel
        bytes[HEADER_SIZE + 8..HEADER_SIZE + 12].copy_from_slice(&0x00FF_FFFFu32.to_le_bytes());
        assert!(matches!(
            SaveFile::from_bytes(&bytes),
            Err(SaveError::Codec(CodecError::NameTooLong { .. }))
        ));
    }

    #[test]
    fn test_trailing_bytes_are_corruption() {
        let mut bytes = SaveFile::from_olympiad(&reference()).to_bytes().unwrap();
        bytes.push(0);
        assert!(matches!(SaveFile::from_bytes(&bytes), Err(SaveError::Corruption(_))));
    }

    #[derive(Debug, Clone)]
    enum RosterOp {
        AddPlayer,
        AddTournament,
        RemovePlayer(usize),
        RemoveTournament(usize),
        Register(usize, usize),
        Unregister(usize, usize),
        Rename(usize),
        Score(usize, u16, u16),
    }

    fn roster_op() -> impl Strategy<Value = RosterOp> {
        prop_oneof![
            3 => Just(RosterOp::AddPlayer),
            2 => Just(RosterOp::AddTournament),
            1 => any::<usize>().prop_map(RosterOp::RemovePlayer),
            1 => any::<usize>().prop_map(RosterOp::RemoveTournament),
            3 => (any::<usize>(), any::<usize>()).prop_map(|(p, t)| RosterOp::Register(p, t)),
            1 => (any::<usize>(), any::<usize>()).prop_map(|(p, t)| RosterOp::Unregister(p, t)),
            1 => any::<usize>().prop_map(RosterOp::Rename),
            1 => (any::<usize>(), any::<u16>(), any::<u16>())
                .prop_map(|(t, a, b)| RosterOp::Score(t, a, b)),
        ]
    }

    fn pick(olympiad: &Olympiad, kind: EntityKind, n: usize) -> Option<String> {
        let list = match kind {
            EntityKind::Player => &olympiad.players,
            EntityKind::Tournament => &olympiad.tournaments,
        };
        let names: Vec<&str> = list.names().collect();
        if names.is_empty() {
            return None;
        }
        Some(names[n % names.len()].to_string())
    }

    proptest! {
        #[test]
        fn prop_save_load_roundtrip(
            capacity in 0u32..=12,
            ops in prop::collection::vec(roster_op(), 0..60),
        ) {
            let mut olympiad = Olympiad::new(capacity).unwrap();
            let mut serial = 0u32;

            for op in ops {
                serial += 1;
                match op {
                    RosterOp::AddPlayer => {
                        let _ = olympiad.add_player(&format!("P{}", serial));
                    }
                    RosterOp::AddTournament => {
                        let _ = olympiad.add_tournament(&format!("T{}", serial));
                    }
                    RosterOp::RemovePlayer(n) => {
                        if let Some(name) = pick(&olympiad, EntityKind::Player, n) {
                            olympiad.remove_player(&name).unwrap();
                        }
                    }
                    RosterOp::RemoveTournament(n) => {
                        if let Some(name) = pick(&olympiad, EntityKind::Tournament, n) {
                            olympiad.remove_tournament(&name).unwrap();
                        }
                    }
                    RosterOp::Register(p, t) | RosterOp::Unregister(p, t) => {
                        let register = matches!(op, RosterOp::Register(..));
                        if let (Some(p), Some(t)) = (
                            pick(&olympiad, EntityKind::Player, p),
                            pick(&olympiad, EntityKind::Tournament, t),
                        ) {
                            if register {
                                olympiad.register(&p, &t).unwrap();
                                olympiad.assign_medal(&p, &t, Medal::Bronze).unwrap();
                            } else {
                                olympiad.unregister(&p, &t).unwrap();
                            }
                        }
                    }
                    RosterOp::Rename(n) => {
                        if let Some(name) = pick(&olympiad, EntityKind::Player, n) {
                            let renamed = format!("R{}", serial);
                            olympiad.rename(EntityKind::Player, &name, &renamed).unwrap();
                        }
                    }
                    RosterOp::Score(t, a, b) => {
                        if let Some(name) = pick(&olympiad, EntityKind::Tournament, t) {
                            let index = olympiad.tournaments.find(&name).unwrap();
                            let entity = olympiad.tournaments.get_mut(index).unwrap();
                            entity.set_phase(Phase::Group);
                            entity.group_phase.record_score(t % 16, 0, 1, a, b);
                        }
                    }
                }
            }

            prop_assert!(olympiad.verify().is_ok());

            let file = SaveFile::from_olympiad(&olympiad);
            let bytes = file.to_bytes().unwrap();

            let loaded = SaveFile::from_bytes(&bytes).unwrap();
            prop_assert_eq!(&loaded, &file);

            let loaded = loaded.into_olympiad();
            prop_assert!(loaded.verify().is_ok());
            prop_assert_eq!(loaded, olympiad);
        }
    }
}
