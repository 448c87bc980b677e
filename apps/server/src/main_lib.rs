use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use healthpal_core::{
    alerts::{AlertService, AlertServiceTrait},
    consultations::{ConsultationService, ConsultationServiceTrait},
    donations::{DonationService, DonationServiceTrait},
    medications::{MedicationService, MedicationServiceTrait},
    mental_health::{ChatService, ChatServiceTrait},
    missions::{MissionService, MissionServiceTrait},
    transparency::{TransparencyService, TransparencyServiceTrait},
    treatments::{TreatmentService, TreatmentServiceTrait},
    users::{UserService, UserServiceTrait},
};
use healthpal_storage_sqlite::{
    alerts::AlertRepository,
    consultations::ConsultationRepository,
    db::{self, DbPool},
    donations::DonationRepository,
    medications::MedicationRepository,
    mental_health::ChatRepository,
    missions::MissionRepository,
    treatments::TreatmentRepository,
    users::UserRepository,
};

use crate::{
    auth::AuthManager,
    config::{Config, LogFormat},
};

pub struct AppState {
    pub treatment_service: Arc<dyn TreatmentServiceTrait>,
    pub donation_service: Arc<dyn DonationServiceTrait>,
    pub transparency_service: Arc<dyn TransparencyServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub consultation_service: Arc<dyn ConsultationServiceTrait>,
    pub medication_service: Arc<dyn MedicationServiceTrait>,
    pub alert_service: Arc<dyn AlertServiceTrait>,
    pub chat_service: Arc<dyn ChatServiceTrait>,
    pub mission_service: Arc<dyn MissionServiceTrait>,
    pub auth: Arc<AuthManager>,
    pub pool: Arc<DbPool>,
}

pub fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone())?;

    let treatment_repository = Arc::new(TreatmentRepository::new(pool.clone(), writer.clone()));
    let donation_repository = Arc::new(DonationRepository::new(pool.clone(), writer.clone()));
    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let consultation_repository =
        Arc::new(ConsultationRepository::new(pool.clone(), writer.clone()));
    let medication_repository = Arc::new(MedicationRepository::new(pool.clone(), writer.clone()));
    let alert_repository = Arc::new(AlertRepository::new(pool.clone(), writer.clone()));
    let chat_repository = Arc::new(ChatRepository::new(pool.clone(), writer.clone()));
    let mission_repository = Arc::new(MissionRepository::new(pool.clone(), writer));

    let treatment_service = Arc::new(TreatmentService::new(treatment_repository));
    let donation_service = Arc::new(
        DonationService::new(donation_repository.clone())
            .with_max_attempts(config.donation_max_attempts),
    );
    let transparency_service = Arc::new(TransparencyService::new(donation_repository));
    let user_service = Arc::new(UserService::new(user_repository.clone()));
    let consultation_service = Arc::new(ConsultationService::new(
        consultation_repository,
        user_repository,
    ));
    let medication_service = Arc::new(MedicationService::new(medication_repository));
    let alert_service = Arc::new(AlertService::new(alert_repository));
    let chat_service = Arc::new(ChatService::new(chat_repository));
    let mission_service = Arc::new(MissionService::new(mission_repository));

    Ok(Arc::new(AppState {
        treatment_service,
        donation_service,
        transparency_service,
        user_service,
        consultation_service,
        medication_service,
        alert_service,
        chat_service,
        mission_service,
        auth: Arc::new(AuthManager::new(&config.jwt_secret)),
        pool,
    }))
}
