/// `GET <health_path>`: liveness probe.
pub async fn health() -> &'static str {
    "OK"
}
