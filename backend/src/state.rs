//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Load once**: the life-expectancy table is read at startup and never mutated
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap

use crate::config::AppConfig;
use crate::countdown::{CountdownBoard, Scheduler, TokioScheduler};
use crate::services::CalculationSettings;
use onelifetime_shared::LifeExpectancyTable;
use std::sync::Arc;

/// Shared application state
///
/// - `table`: immutable, wrapped in Arc
/// - `config`: wrapped in Arc
/// - `countdowns`: internally Arc'd
#[derive(Clone)]
pub struct AppState {
    /// Life-expectancy table loaded at startup
    pub table: Arc<LifeExpectancyTable>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Counters currently on display
    pub countdowns: CountdownBoard,
}

impl AppState {
    /// Create the state with a tokio-driven countdown board
    pub fn new(table: LifeExpectancyTable, config: AppConfig) -> Self {
        Self::with_scheduler(table, config, Arc::new(TokioScheduler::new()))
    }

    pub fn with_scheduler(
        table: LifeExpectancyTable,
        config: AppConfig,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let countdowns = CountdownBoard::new(scheduler, config.countdown.update_buffer);

        Self {
            table: Arc::new(table),
            config: Arc::new(config),
            countdowns,
        }
    }

    #[inline]
    pub fn table(&self) -> &LifeExpectancyTable {
        &self.table
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn calculation_settings(&self) -> CalculationSettings {
        CalculationSettings {
            comparison_count: self.config.countdown.comparison_count,
            grouping: self.config.display.digit_grouping,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onelifetime_shared::DigitGrouping;

    #[tokio::test]
    async fn test_state_clone_shares_table() {
        let state = AppState::new(LifeExpectancyTable::fallback(), AppConfig::default());
        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.table, &cloned.table));
    }

    #[tokio::test]
    async fn test_board_ticks_every_second() {
        let state = AppState::new(LifeExpectancyTable::fallback(), AppConfig::default());
        assert_eq!(state.countdowns.period(), std::time::Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_calculation_settings_from_config() {
        let mut config = AppConfig::default();
        config.countdown.comparison_count = 3;
        config.display.digit_grouping = DigitGrouping::Comma;

        let state = AppState::new(LifeExpectancyTable::fallback(), config);
        let settings = state.calculation_settings();
        assert_eq!(settings.comparison_count, 3);
        assert_eq!(settings.grouping, DigitGrouping::Comma);
    }
}
