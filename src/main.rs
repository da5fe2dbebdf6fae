//! LinguaDesk daemon
//!
//! Signs in to the school backend, loads the dashboard for the signed-in
//! role and runs the automatic lesson status transitions until Ctrl-C.

use anyhow::Context;
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn, error};

use LinguaDesk::{
    config::{validation::validate_auth_config, Settings},
    models::LoginOutcome,
    roles::{Action, Dashboard, DashboardSummary},
    services::ServiceFactory,
    store::AppStore,
    transitions::{LessonStatusTransitionService, RuleTable, TransitionScheduler},
    utils::{helpers::is_valid_mfa_code, logging},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;

    if std::env::args().any(|arg| arg == "--print-config") {
        println!("{}", settings.to_toml()?);
        return Ok(());
    }

    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", LinguaDesk::info());

    validate_auth_config(&settings.auth)?;

    info!("Initializing services...");
    let services = ServiceFactory::new(&settings)?;
    let store = AppStore::new();

    sign_in(&settings, &services, &store).await?;

    let user = store
        .read(|s| s.auth.user.clone())
        .await
        .context("Signed in without a user profile")?;
    logging::log_user_action(user.id, "signed_in", Some(user.role.as_str()));

    let health = services.health_check().await;
    if !health.is_healthy() {
        for issue in health.get_issues() {
            warn!(issue = %issue, "Service health check");
        }
    }

    let dashboard = Dashboard::for_user(&user);
    dashboard.load(&services, &store, Utc::now()).await;
    let summary = DashboardSummary::from_state(&store.snapshot().await, Utc::now());
    info!(
        role = %user.role,
        upcoming_lessons = summary.upcoming_lessons,
        awaiting_confirmation = summary.awaiting_confirmation,
        unread_notifications = summary.unread_notifications,
        "Dashboard ready"
    );
    for message in &summary.errors {
        warn!(error = %message, "Dashboard section failed to load");
    }

    let mut scheduler = TransitionScheduler::new(settings.scheduler.poll_interval());
    if !settings.features.auto_transitions {
        info!("Automatic lesson transitions disabled");
    } else if !user.role.can(Action::ChangeLessonStatus) {
        warn!(role = %user.role, "Role may not change lesson status, transitions not started");
    } else {
        let rules = RuleTable::new((&settings.scheduler).into());
        let transitions = LessonStatusTransitionService::new(services.lesson_service.clone(), rules);
        scheduler.start(transitions);
    }

    info!("LinguaDesk is running, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;

    info!("Shutting down...");
    scheduler.stop();
    if let Err(e) = store.logout(&services).await {
        error!(error = %e, "Logout failed");
    }

    info!("LinguaDesk has been shut down.");
    Ok(())
}

/// Password step, then the MFA code from config or stdin if asked for one
async fn sign_in(settings: &Settings, services: &ServiceFactory, store: &AppStore) -> anyhow::Result<()> {
    let outcome = store
        .login(services, &settings.auth.email, &settings.auth.password)
        .await
        .context("Login failed")?;

    if let LoginOutcome::MfaRequired { .. } = outcome {
        let code = match settings.auth.mfa_code.clone() {
            Some(code) => code,
            None => read_mfa_code().await?,
        };
        store
            .verify_mfa(services, &code)
            .await
            .context("MFA verification failed")?;
    }

    Ok(())
}

async fn read_mfa_code() -> anyhow::Result<String> {
    println!("Enter the 6-digit code from your authenticator app:");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read MFA code")?;

    let code = line.trim().to_string();
    if !is_valid_mfa_code(&code) {
        anyhow::bail!("MFA code must be 6 digits");
    }
    Ok(code)
}
