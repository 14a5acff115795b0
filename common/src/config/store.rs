//! Persistent configuration store.
//!
//! [`ConfigStore`] owns the single live [`GaugeConfig`] and mirrors it into a
//! [`KeyValueStore`] backend. The live record only changes after the backend
//! has committed, so a failed write leaves the gauge running on the last good
//! configuration.

use super::record::{ConfigUpdate, Corrections, GaugeConfig, keys};

/// Errors raised by a storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    #[error("storage medium failed")]
    Medium,
    #[error("storage namespace is full")]
    Full,
    #[error("key exceeds 15 characters")]
    KeyTooLong,
    #[error("snapshot does not fit the storage buffer")]
    Encode,
    #[error("stored snapshot is corrupted")]
    Corrupted,
}

/// Typed key-value persistence, one namespace per store.
///
/// Reads return `None` for absent keys or a type mismatch. Writes may be
/// buffered until [`commit`](KeyValueStore::commit).
pub trait KeyValueStore {
    fn get_bool(
        &mut self,
        key: &str,
    ) -> Option<bool>;

    fn get_f32(
        &mut self,
        key: &str,
    ) -> Option<f32>;

    fn get_i32(
        &mut self,
        key: &str,
    ) -> Option<i32>;

    fn put_bool(
        &mut self,
        key: &str,
        value: bool,
    ) -> Result<(), StorageError>;

    fn put_f32(
        &mut self,
        key: &str,
        value: f32,
    ) -> Result<(), StorageError>;

    fn put_i32(
        &mut self,
        key: &str,
        value: i32,
    ) -> Result<(), StorageError>;

    /// Remove every key in the namespace.
    fn clear(&mut self) -> Result<(), StorageError>;

    /// Make buffered writes durable.
    fn commit(&mut self) -> Result<(), StorageError> { Ok(()) }
}

/// Result of a successful save.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SaveOutcome {
    pub config: GaugeConfig,
    pub corrections: Corrections,
}

/// Owner of the live configuration record.
pub struct ConfigStore<S> {
    storage: S,
    config: GaugeConfig,
}

impl<S: KeyValueStore> ConfigStore<S> {
    /// Open the store and read the persisted record, defaulting missing keys.
    pub fn open(mut storage: S) -> Self {
        let config = read_config(&mut storage);
        Self { storage, config }
    }

    /// The live record.
    #[inline]
    pub const fn config(&self) -> &GaugeConfig { &self.config }

    /// Re-read every key from the backend into the live record.
    pub fn load(&mut self) -> &GaugeConfig {
        self.config = read_config(&mut self.storage);
        &self.config
    }

    /// Validate `update` against the live record, persist it, then adopt it.
    ///
    /// On error the live record is unchanged.
    pub fn save(
        &mut self,
        update: &ConfigUpdate,
    ) -> Result<SaveOutcome, StorageError> {
        let (next, corrections) = self.config.apply(update);

        if let Err(err) = write_config(&mut self.storage, &next) {
            // Put the buffered values back so a later commit cannot persist a
            // record that was never live. Best effort, the original error wins.
            let _ = write_config(&mut self.storage, &self.config);
            return Err(err);
        }

        self.config = next;
        Ok(SaveOutcome { config: next, corrections })
    }

    /// Erase every persisted key and fall back to factory defaults.
    pub fn reset_to_defaults(&mut self) -> Result<&GaugeConfig, StorageError> {
        self.storage.clear()?;
        self.storage.commit()?;
        Ok(self.load())
    }

    #[inline]
    pub const fn storage(&self) -> &S { &self.storage }

    pub fn into_inner(self) -> S { self.storage }
}

fn read_config<S: KeyValueStore>(storage: &mut S) -> GaugeConfig {
    let d = GaugeConfig::DEFAULT;
    let mut config = GaugeConfig {
        use_simulated_data: storage.get_bool(keys::SIM_DATA).unwrap_or(d.use_simulated_data),
        use_simulated_temp: storage.get_bool(keys::SIM_TEMP).unwrap_or(d.use_simulated_temp),
        use_simulated_headlight: storage
            .get_bool(keys::SIM_HEADLIGHT)
            .unwrap_or(d.use_simulated_headlight),
        sensor_min_voltage: storage.get_f32(keys::SENSOR_MIN_V).unwrap_or(d.sensor_min_voltage),
        sensor_max_voltage: storage.get_f32(keys::SENSOR_MAX_V).unwrap_or(d.sensor_max_voltage),
        sensor_max_psi: storage.get_f32(keys::SENSOR_MAX_PSI).unwrap_or(d.sensor_max_psi),
        voltage_divider_r1: storage.get_f32(keys::DIVIDER_R1).unwrap_or(d.voltage_divider_r1),
        voltage_divider_r2: storage.get_f32(keys::DIVIDER_R2).unwrap_or(d.voltage_divider_r2),
        oil_pressure_min_safe: storage.get_f32(keys::OIL_SAFE).unwrap_or(d.oil_pressure_min_safe),
        oil_pressure_min_warn: storage.get_f32(keys::OIL_WARN).unwrap_or(d.oil_pressure_min_warn),
        temp_warning_high: storage.get_f32(keys::TEMP_WARN).unwrap_or(d.temp_warning_high),
        bl_brightness_day: storage.get_i32(keys::BL_DAY).unwrap_or(d.bl_brightness_day),
        bl_brightness_night: storage.get_i32(keys::BL_NIGHT).unwrap_or(d.bl_brightness_night),
        bl_fade_duration: storage.get_i32(keys::BL_FADE).unwrap_or(d.bl_fade_duration),
        ema_alpha: storage.get_f32(keys::EMA_ALPHA).unwrap_or(d.ema_alpha),
    };
    config.sanitize();
    config
}

fn write_config<S: KeyValueStore>(
    storage: &mut S,
    config: &GaugeConfig,
) -> Result<(), StorageError> {
    storage.put_bool(keys::SIM_DATA, config.use_simulated_data)?;
    storage.put_bool(keys::SIM_TEMP, config.use_simulated_temp)?;
    storage.put_bool(keys::SIM_HEADLIGHT, config.use_simulated_headlight)?;
    storage.put_f32(keys::SENSOR_MIN_V, config.sensor_min_voltage)?;
    storage.put_f32(keys::SENSOR_MAX_V, config.sensor_max_voltage)?;
    storage.put_f32(keys::SENSOR_MAX_PSI, config.sensor_max_psi)?;
    storage.put_f32(keys::DIVIDER_R1, config.voltage_divider_r1)?;
    storage.put_f32(keys::DIVIDER_R2, config.voltage_divider_r2)?;
    storage.put_f32(keys::OIL_SAFE, config.oil_pressure_min_safe)?;
    storage.put_f32(keys::OIL_WARN, config.oil_pressure_min_warn)?;
    storage.put_f32(keys::TEMP_WARN, config.temp_warning_high)?;
    storage.put_i32(keys::BL_DAY, config.bl_brightness_day)?;
    storage.put_i32(keys::BL_NIGHT, config.bl_brightness_night)?;
    storage.put_i32(keys::BL_FADE, config.bl_fade_duration)?;
    storage.put_f32(keys::EMA_ALPHA, config.ema_alpha)?;
    storage.commit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStore;

    /// Memory store whose commit can be made to fail.
    struct FlakyStore {
        inner: MemoryStore,
        fail_commit: bool,
        commits: u32,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self { inner: MemoryStore::new(), fail_commit: false, commits: 0 }
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get_bool(&mut self, key: &str) -> Option<bool> { self.inner.get_bool(key) }
        fn get_f32(&mut self, key: &str) -> Option<f32> { self.inner.get_f32(key) }
        fn get_i32(&mut self, key: &str) -> Option<i32> { self.inner.get_i32(key) }
        fn put_bool(&mut self, key: &str, value: bool) -> Result<(), StorageError> {
            self.inner.put_bool(key, value)
        }
        fn put_f32(&mut self, key: &str, value: f32) -> Result<(), StorageError> {
            self.inner.put_f32(key, value)
        }
        fn put_i32(&mut self, key: &str, value: i32) -> Result<(), StorageError> {
            self.inner.put_i32(key, value)
        }
        fn clear(&mut self) -> Result<(), StorageError> { self.inner.clear() }
        fn commit(&mut self) -> Result<(), StorageError> {
            self.commits += 1;
            if self.fail_commit { Err(StorageError::Medium) } else { Ok(()) }
        }
    }

    #[test]
    fn test_empty_storage_loads_defaults() {
        let store = ConfigStore::open(MemoryStore::new());
        assert_eq!(*store.config(), GaugeConfig::DEFAULT);
    }

    #[test]
    fn test_partial_storage_defaults_missing_keys() {
        let mut memory = MemoryStore::new();
        memory.put_f32(keys::OIL_WARN, 14.0).unwrap();
        memory.put_bool(keys::SIM_DATA, false).unwrap();

        let store = ConfigStore::open(memory);
        assert_eq!(store.config().oil_pressure_min_warn, 14.0);
        assert!(!store.config().use_simulated_data);
        assert_eq!(store.config().sensor_max_psi, GaugeConfig::DEFAULT.sensor_max_psi);
    }

    #[test]
    fn test_load_sanitizes_stale_values() {
        let mut memory = MemoryStore::new();
        memory.put_f32(keys::DIVIDER_R2, -1.0).unwrap();
        memory.put_i32(keys::BL_DAY, 999).unwrap();

        let store = ConfigStore::open(memory);
        assert_eq!(store.config().voltage_divider_r2, 10000.0);
        assert_eq!(store.config().bl_brightness_day, 255);
    }

    #[test]
    fn test_stored_nan_alpha_loads_default() {
        let mut memory = MemoryStore::new();
        memory.put_f32(keys::EMA_ALPHA, f32::NAN).unwrap();
        memory.put_f32(keys::OIL_SAFE, f32::NAN).unwrap();

        let store = ConfigStore::open(memory);
        let alpha = store.config().smoothing_alpha();
        assert!(alpha.is_finite());
        assert_eq!(alpha, GaugeConfig::DEFAULT.ema_alpha);
        assert_eq!(store.config().oil_pressure_min_safe, GaugeConfig::DEFAULT.oil_pressure_min_safe);
    }

    #[test]
    fn test_save_persists_and_adopts() {
        let mut store = ConfigStore::open(MemoryStore::new());
        let mut update = ConfigUpdate::from_config(store.config());
        update.oil_pressure_min_warn = Some(12.5);
        update.use_simulated_temp = false;

        let outcome = store.save(&update).unwrap();
        assert!(outcome.corrections.is_clean());
        assert_eq!(store.config().oil_pressure_min_warn, 12.5);

        let reopened = ConfigStore::open(store.into_inner());
        assert_eq!(reopened.config().oil_pressure_min_warn, 12.5);
        assert!(!reopened.config().use_simulated_temp);
    }

    #[test]
    fn test_save_reports_corrections() {
        let mut store = ConfigStore::open(MemoryStore::new());
        let mut update = ConfigUpdate::from_config(store.config());
        update.voltage_divider_r2 = Some(-5.0);

        let outcome = store.save(&update).unwrap();
        assert!(outcome.corrections.divider_reset);
        assert_eq!(outcome.config.voltage_divider_r2, 10000.0);
    }

    #[test]
    fn test_failed_commit_keeps_live_record() {
        let mut store = ConfigStore::open(FlakyStore::new());
        let before = *store.config();

        let mut update = ConfigUpdate::from_config(&before);
        update.sensor_max_psi = Some(150.0);
        store.storage.fail_commit = true;

        assert_eq!(store.save(&update), Err(StorageError::Medium));
        assert_eq!(*store.config(), before);

        // Buffered values were rolled back as well
        store.storage.fail_commit = false;
        assert_eq!(*store.load(), before);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = ConfigStore::open(MemoryStore::new());
        let mut update = ConfigUpdate::from_config(store.config());
        update.bl_brightness_night = Some(10);
        store.save(&update).unwrap();

        assert_eq!(*store.reset_to_defaults().unwrap(), GaugeConfig::DEFAULT);
        assert!(store.storage().is_empty());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut store = ConfigStore::open(MemoryStore::new());
        let first = *store.reset_to_defaults().unwrap();
        let second = *store.reset_to_defaults().unwrap();
        assert_eq!(first, second);
        assert_eq!(second, GaugeConfig::DEFAULT);
    }

    #[test]
    fn test_reset_commits() {
        let mut store = ConfigStore::open(FlakyStore::new());
        store.reset_to_defaults().unwrap();
        assert_eq!(store.storage().commits, 1);
    }
}
