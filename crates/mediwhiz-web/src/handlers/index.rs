pub async fn index() -> &'static str {
    "MediWhiz API is running"
}
