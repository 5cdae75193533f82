#[tokio::main]
async fn main() -> std::io::Result<()> {
    // .env.local wins, dotenvy never overrides a variable that is already set.
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    checkin_server::start_server().await
}
