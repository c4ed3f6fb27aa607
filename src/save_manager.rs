//! Profile persistence with a checksummed binary format.
//!
//! The core never calls save/load itself; the host invokes the adapter at
//! times of its choosing and passes the whole profile in and out. A failed
//! save leaves the in-memory profile untouched (the adapter only ever
//! borrows it), so the host can retry.

use crate::constants::SAVE_VERSION_MAGIC;
use crate::profile::PlayerProfile;
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// Opaque load/save pair the host drives around batches of core mutations.
pub trait PersistenceAdapter {
    /// Persists the full profile state.
    fn save(&self, profile: &PlayerProfile) -> io::Result<()>;

    /// Loads the persisted profile, or `None` if nothing has been saved yet.
    fn load(&self) -> io::Result<Option<PlayerProfile>>;
}

/// File-backed adapter storing the profile in the platform config directory.
///
/// File format:
/// - Version magic (8 bytes)
/// - Data length (4 bytes)
/// - Serialized profile (variable length)
/// - SHA256 checksum (32 bytes)
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    pub fn new() -> io::Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "questline").ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })?;

        let config_dir = project_dirs.config_dir();
        fs::create_dir_all(config_dir)?;

        Ok(Self {
            save_path: config_dir.join("profile.dat"),
        })
    }

    /// Creates a manager writing to an explicit path (useful for hosts that
    /// manage multiple profiles, and for tests).
    pub fn with_path(save_path: PathBuf) -> Self {
        Self { save_path }
    }

    pub fn save_exists(&self) -> bool {
        self.save_path.exists()
    }

    /// Creates a SaveManager with a unique temporary path.
    #[cfg(test)]
    fn new_for_test() -> io::Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

        let test_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir().join(format!("questline-test-{}", test_id));
        fs::create_dir_all(&temp_dir)?;

        Ok(Self {
            save_path: temp_dir.join("profile.dat"),
        })
    }
}

impl PersistenceAdapter for SaveManager {
    fn save(&self, profile: &PlayerProfile) -> io::Result<()> {
        let data = bincode::serialize(profile)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let data_len = data.len() as u32;

        // Checksum covers version + length + data
        let mut hasher = Sha256::new();
        hasher.update(SAVE_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        let mut file = fs::File::create(&self.save_path)?;
        file.write_all(&SAVE_VERSION_MAGIC.to_le_bytes())?;
        file.write_all(&data_len.to_le_bytes())?;
        file.write_all(&data)?;
        file.write_all(&checksum)?;

        Ok(())
    }

    fn load(&self) -> io::Result<Option<PlayerProfile>> {
        let mut file = match fs::File::open(&self.save_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);
        if version != SAVE_VERSION_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Invalid save version: expected 0x{:016X}, got 0x{:016X}",
                    SAVE_VERSION_MAGIC, version
                ),
            ));
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        let computed_checksum = hasher.finalize();

        if stored_checksum != computed_checksum.as_slice() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Checksum verification failed",
            ));
        }

        let profile = bincode::deserialize::<PlayerProfile>(&data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Some(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;
    use crate::wallet::Currency;
    use chrono::NaiveDate;

    fn sample_profile() -> PlayerProfile {
        let mut profile = PlayerProfile::new();
        profile.select_character(CharacterClass::Warrior);
        profile.add_experience(250, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        profile.wallet.add(Currency::SkillPoints, 12);
        profile.add_partner("slime".to_string());
        profile
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let manager = SaveManager::new_for_test().unwrap();
        let original = sample_profile();

        manager.save(&original).unwrap();
        assert!(manager.save_exists());

        let loaded = manager.load().unwrap().expect("profile should exist");
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_absent_returns_none() {
        let manager = SaveManager::new_for_test().unwrap();
        assert!(!manager.save_exists());
        assert!(manager.load().unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_existing() {
        let manager = SaveManager::new_for_test().unwrap();
        manager.save(&sample_profile()).unwrap();

        let mut second = PlayerProfile::new();
        second.wallet.add(Currency::PartnerTickets, 99);
        manager.save(&second).unwrap();

        let loaded = manager.load().unwrap().unwrap();
        assert_eq!(loaded.wallet.balance(Currency::PartnerTickets), 99);
    }

    #[test]
    fn test_load_corrupted_file_fails() {
        let manager = SaveManager::new_for_test().unwrap();
        fs::write(&manager.save_path, b"random garbage that is not a save").unwrap();

        let result = manager.load();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_load_truncated_file_fails() {
        let manager = SaveManager::new_for_test().unwrap();
        fs::write(&manager.save_path, SAVE_VERSION_MAGIC.to_le_bytes()).unwrap();
        assert!(manager.load().is_err());
    }

    #[test]
    fn test_load_wrong_version_magic_fails() {
        let manager = SaveManager::new_for_test().unwrap();
        let mut data = Vec::new();
        data.extend_from_slice(&0xDEADBEEFu64.to_le_bytes());
        data.extend_from_slice(&[0u8; 64]);
        fs::write(&manager.save_path, &data).unwrap();

        let err = manager.load().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn test_load_bad_checksum_fails() {
        let manager = SaveManager::new_for_test().unwrap();
        manager.save(&sample_profile()).unwrap();

        let mut data = fs::read(&manager.save_path).unwrap();
        let len = data.len();
        data[len - 1] ^= 0xFF;
        data[len - 2] ^= 0xFF;
        fs::write(&manager.save_path, &data).unwrap();

        let err = manager.load().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("Checksum"));
    }

    #[test]
    fn test_load_corrupted_payload_fails_checksum() {
        let manager = SaveManager::new_for_test().unwrap();
        manager.save(&sample_profile()).unwrap();

        let mut data = fs::read(&manager.save_path).unwrap();
        // Flip bytes inside the payload (after the 12-byte header)
        data[14] ^= 0xFF;
        data[15] ^= 0xFF;
        fs::write(&manager.save_path, &data).unwrap();

        assert_eq!(
            manager.load().unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );
    }
}
