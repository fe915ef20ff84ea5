use medi_check::config::{AppConfig, CatalogConfig};
use medi_check::error::AppError;
use medi_check::workflows::diagnosis::ConditionCatalog;
use medi_check::workflows::wait_times::{
    CareOptionRegistry, SharedQueueState, TreatmentCatalog, WaitTimeCalculator,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn load_condition_catalog(config: &CatalogConfig) -> Result<ConditionCatalog, AppError> {
    let catalog = match &config.condition_csv {
        Some(path) => {
            let catalog = ConditionCatalog::from_path(path)?;
            info!(path = %path.display(), conditions = catalog.len(), "loaded condition catalog");
            catalog
        }
        None => ConditionCatalog::standard(),
    };
    Ok(catalog)
}

pub(crate) fn load_treatments(config: &CatalogConfig) -> Result<TreatmentCatalog, AppError> {
    let treatments = match &config.treatment_csv {
        Some(path) => {
            let treatments = TreatmentCatalog::from_path(path)?;
            info!(path = %path.display(), profiles = treatments.len(), "loaded treatment table");
            treatments
        }
        None => TreatmentCatalog::standard(),
    };
    Ok(treatments)
}

/// Standard care options, configured treatment table and a queue seeded per the queue policy.
pub(crate) fn build_calculator(config: &AppConfig) -> Result<WaitTimeCalculator, AppError> {
    let registry = Arc::new(CareOptionRegistry::standard());
    let treatments = Arc::new(load_treatments(&config.catalogs)?);
    let queue = Arc::new(SharedQueueState::seeded(&registry, config.queue.seed));
    Ok(WaitTimeCalculator::new(registry, treatments, queue))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medi_check::config::{
        AppEnvironment, QueueConfig, ServerConfig, TelemetryConfig,
    };
    use medi_check::workflows::diagnosis::CatalogError;
    use medi_check::workflows::wait_times::QueueSeed;
    use std::path::PathBuf;

    fn config_with(catalogs: CatalogConfig, seed: QueueSeed) -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
            catalogs,
            queue: QueueConfig { seed },
        }
    }

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).expect("fixture written");
        path
    }

    #[test]
    fn defaults_to_standard_reference_data() {
        let config = config_with(CatalogConfig::default(), QueueSeed::Fixed { minutes: 10 });
        let calculator = build_calculator(&config).expect("calculator builds");

        assert_eq!(calculator.registry().len(), 5);
        assert!(calculator
            .queue_snapshot()
            .values()
            .all(|minutes| *minutes == 10));
        assert_eq!(
            load_condition_catalog(&config.catalogs)
                .expect("standard catalog")
                .len(),
            15
        );
    }

    #[test]
    fn loads_treatment_override_from_csv() {
        let path = write_fixture(
            "treatments.csv",
            "diagnosis,expected_minutes,variability_minutes,severity\nPaper Cut,5,1,low\n",
        );
        let config = config_with(
            CatalogConfig {
                condition_csv: None,
                treatment_csv: Some(path.clone()),
            },
            QueueSeed::default(),
        );

        let calculator = build_calculator(&config).expect("calculator builds");
        assert_eq!(calculator.treatments().len(), 1);
        assert_eq!(calculator.calculate_wait_times("Paper Cut").len(), 5);
        assert!(calculator
            .calculate_wait_times("Orthopedic Injuries: Dislocation")
            .is_empty());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_condition_file_is_a_catalog_error() {
        let catalogs = CatalogConfig {
            condition_csv: Some(PathBuf::from("/nonexistent/medi-check/conditions.csv")),
            treatment_csv: None,
        };
        let err = load_condition_catalog(&catalogs).expect_err("missing file");
        assert!(matches!(err, AppError::Catalog(CatalogError::Io(_))));
    }
}
