#[tokio::main]
async fn main() -> anyhow::Result<()> {
    xslgpt_lib::run().await
}
