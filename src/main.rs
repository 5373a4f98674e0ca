use actix_web::{middleware, web, App, HttpServer};
use std::io;

use boardgame_reviews::api;
use boardgame_reviews::config::Config;
use boardgame_reviews::db::{test_data, Database};
use boardgame_reviews::utils::logging;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load configuration
    let config = Config::load().map_err(io::Error::other)?;
    let logger = logging::init(&config).map_err(io::Error::other)?;

    // Initialize the database
    let db = Database::new(&config.database_path).map_err(io::Error::other)?;
    db.create_schema().await.map_err(io::Error::other)?;
    if config.seed_on_start {
        db.seed(&test_data::test_data())
            .await
            .map_err(io::Error::other)?;
    }

    log::info!("[SERVER] listening on http://{}", config.site_addr);

    // Every worker App owns a clone of the handle until it exits
    let data = web::Data::new(db.clone());
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }
    server.bind(&config.site_addr)?.run().await?;

    log::info!("[SERVER] stopped");
    if !db.close().await.map_err(io::Error::other)? {
        log::info!("[DB] connection closes when the last worker exits");
    }
    logging::shutdown(logger);
    Ok(())
}
