use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;

use polyvox_server::controllers::speech::SpeechController;
use polyvox_server::domain::speech::{LanguageCode, SpeechService};
use polyvox_server::infrastructure::engine::{ModelRegistry, SpeechModel};
use polyvox_server::infrastructure::http::build_router;

pub mod stub_engine;

use api_client::TestClient;
use stub_engine::{StubModel, SynthCall};

// Keep test output quiet unless RUST_LOG says otherwise
static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .try_init();
});

pub struct TestContext {
    pub client: TestClient,
    calls: Arc<Mutex<Vec<SynthCall>>>,
}

impl TestContext {
    /// Standard fixture: a multi-speaker English voice plus a single-speaker
    /// Spanish voice, both backed by stubs
    pub async fn new() -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));

        let english = StubModel::new(
            LanguageCode::English,
            &[
                ("EN-US", 0),
                ("EN-BR", 1),
                ("EN_INDIA", 2),
                ("EN-AU", 3),
                ("EN-Default", 4),
            ],
        )
        .with_default_speaker("EN-US")
        .with_calls(calls.clone());

        let spanish =
            StubModel::new(LanguageCode::Spanish, &[("ES", 0)]).with_calls(calls.clone());

        Self::start_with(vec![Arc::new(english), Arc::new(spanish)], calls).await
    }

    /// Boot the full application over the given models on an ephemeral port
    pub async fn start_with(
        models: Vec<Arc<StubModel>>,
        calls: Arc<Mutex<Vec<SynthCall>>>,
    ) -> Self {
        Lazy::force(&TRACING);

        let mut table: HashMap<LanguageCode, Arc<dyn SpeechModel>> = HashMap::new();
        for model in models {
            table.insert(model.language(), model);
        }

        let registry = Arc::new(ModelRegistry::new(table));
        // Cache stays off in tests so every request reaches the stub
        let speech_service = Arc::new(SpeechService::new(registry.clone(), false));
        let speech_controller = Arc::new(SpeechController::new(speech_service));
        let app = build_router(registry, speech_controller);

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let client = TestClient::new(&base_url);

        Self { client, calls }
    }

    /// Snapshot of every synthesis call the stub models received
    pub fn synth_calls(&self) -> Vec<SynthCall> {
        self.calls.lock().clone()
    }

    pub fn last_synth_call(&self) -> SynthCall {
        self.calls
            .lock()
            .last()
            .cloned()
            .expect("No synthesis call was recorded")
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async { TestContext::new().await }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Server tasks die with the runtime; nothing to clean up
        }
    }
}
