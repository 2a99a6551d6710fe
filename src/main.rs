use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use log::*;
use section_scheduler::catalog::catalog_modified;
use section_scheduler::{load_catalog, Catalog, CatalogError, Config};

use std::process::exit;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

mod routes;

use routes::*;

pub struct MemDatabase {
    pub catalog: Arc<Catalog>,
    pub last_change: u64,
    pub catalog_modified: Option<SystemTime>,
}

impl MemDatabase {
    fn new(catalog: Catalog, catalog_modified: Option<SystemTime>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            last_change: get_unix_timestamp(),
            catalog_modified,
        }
    }
}

pub struct AppState {
    pub database: Mutex<MemDatabase>,
    pub config: Config,
}

impl AppState {
    pub fn new(catalog: Catalog, catalog_modified: Option<SystemTime>, config: Config) -> Self {
        Self {
            database: Mutex::new(MemDatabase::new(catalog, catalog_modified)),
            config,
        }
    }
}

pub fn get_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Reloads the catalog when its file has a new modification time.
/// Returns whether a reload happened.
async fn reload_if_changed(state: &AppState) -> Result<bool, CatalogError> {
    let path = &state.config.catalog_path;
    let modified = catalog_modified(path);

    let lock = state.database.lock().await;
    let previous = lock.catalog_modified;
    drop(lock);

    if modified.is_none() || modified == previous {
        return Ok(false);
    }

    info!("Catalog changed, reloading...");
    let catalog = load_catalog(path)?;
    let number_of_courses = catalog.len();

    let mut lock = state.database.lock().await;
    lock.catalog = Arc::new(catalog);
    lock.last_change = get_unix_timestamp();
    lock.catalog_modified = modified;
    drop(lock);

    info!("Reloaded catalog with {} courses!", number_of_courses);

    Ok(true)
}

async fn reload_loop(state: web::Data<AppState>) {
    let interval = state.config.reload_interval();
    let mut number_of_repeated_errors: u64 = 0;

    loop {
        tokio::time::sleep(interval).await;

        match reload_if_changed(&state).await {
            Ok(true) => number_of_repeated_errors = 0,
            Ok(false) => debug!("Catalog unchanged"),
            Err(e) => {
                number_of_repeated_errors += 1;
                error!("Error reloading catalog: {}", e);
            }
        }

        if number_of_repeated_errors > 5 {
            warn!(
                "Errors have reached dangerous levels!! Currently at {} repeated errors...",
                number_of_repeated_errors
            );
        }
    }
}

/// Runs the actix_web server, with the catalog reload loop living in a
/// spawned task next to it.
async fn async_main(state: web::Data<AppState>) -> std::io::Result<()> {
    if state.config.reload_interval_secs > 0 {
        let loop_state = state.clone();
        actix_web::rt::spawn(async move {
            reload_loop(loop_state).await;
        });
    }

    let address = state.config.address.clone();
    info!("Listening on {}", address);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .allow_any_method()
            .send_wildcard()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(update_all_courses)
            .service(update_if_stale)
            .service(get_course)
            .service(get_exam_conflicts)
            .service(post_generate_schedules)
            .service(get_status)
    })
    .disable_signals()
    .bind(address)?
    .run()
    .await
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = ctrlc::set_handler(move || {
        info!("Exiting...");
        thread::sleep(Duration::from_millis(500));
        exit(0);
    }) {
        error!("Error setting Ctrl-C handler: {}", e);
        exit(1);
    }

    info!("Schedule server starting up...");

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    info!("Loading catalog...");

    let modified = catalog_modified(&config.catalog_path);
    let catalog = match load_catalog(&config.catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    info!("Catalog loaded with {} courses!", catalog.len());

    let state = web::Data::new(AppState::new(catalog, modified, config));

    if let Err(e) = actix_web::rt::System::new().block_on(async_main(state)) {
        error!("Server stopped: {}", e);
        exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ONE_COURSE: &str = r#"[{"code": "COMP2101", "name": "Data Structures", "sections": []}]"#;
    const TWO_COURSES: &str = r#"[
        {"code": "COMP2101", "name": "Data Structures", "sections": []},
        {"code": "MATH1107", "name": "Calculus I", "sections": []}
    ]"#;

    #[actix_web::test]
    async fn reloads_only_when_the_file_changes() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", ONE_COURSE).unwrap();

        let config = Config {
            catalog_path: file.path().to_path_buf(),
            ..Config::default()
        };
        let catalog = load_catalog(&config.catalog_path).unwrap();
        let state = AppState::new(catalog, None, config);

        assert!(reload_if_changed(&state).await.unwrap());
        assert!(!reload_if_changed(&state).await.unwrap());
        assert_eq!(state.database.lock().await.catalog.len(), 1);

        // force a different modification time
        state.database.lock().await.catalog_modified = Some(UNIX_EPOCH);
        let mut file = file.reopen().unwrap();
        write!(file, "{}", TWO_COURSES).unwrap();

        assert!(reload_if_changed(&state).await.unwrap());
        assert_eq!(state.database.lock().await.catalog.len(), 2);
    }
}
