use tracing::error;

#[actix_web::main]
async fn main() -> std::process::ExitCode {
    let _ = dotenvy::dotenv();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    match planix::run().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Planix exited with an error");
            std::process::ExitCode::FAILURE
        }
    }
}
