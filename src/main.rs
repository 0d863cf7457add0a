#[tokio::main]
async fn main() -> anyhow::Result<()> {
    attestation_generator::run().await
}
