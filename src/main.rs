#[tokio::main]
async fn main() -> std::io::Result<()> {
    dungeon_coop::run_with_config().await
}
