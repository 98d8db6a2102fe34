//! Walks the phone login flow end to end with a scripted identity
//! provider, logging every state transition and navigation intent.
//!
//! Run with: `cargo run --example phone_login`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

use cl_core::domain::entities::OtpInputBuffer;
use cl_core::domain::value_objects::NavigationIntent;
use cl_core::errors::ProviderError;
use cl_core::services::auth::{
    IdentityProvider, NavigationBridge, SendCodeRequest, SendOutcome, SessionController,
};
use cl_shared::config::AuthFlowConfig;

/// The code "delivered" by the demo provider
const DELIVERED_CODE: &str = "428117";

#[derive(Debug, Clone)]
struct DemoCredential {
    verification_id: String,
    code: String,
}

/// Provider that pretends to deliver a fixed code over SMS
struct DemoProvider {
    sends: AtomicUsize,
}

#[async_trait]
impl IdentityProvider for DemoProvider {
    type Credential = DemoCredential;

    async fn send_verification_code(
        &self,
        request: SendCodeRequest,
    ) -> Result<SendOutcome<DemoCredential>, ProviderError> {
        let call = self.sends.fetch_add(1, Ordering::SeqCst) + 1;
        println!(
            "[provider] delivering code {} to {} (resend: {})",
            DELIVERED_CODE,
            request.phone,
            request.resend_token.is_some()
        );
        Ok(SendOutcome::CodeSent {
            verification_id: format!("vid-{}", call),
            resend_token: format!("tok-{}", call),
        })
    }

    fn build_credential(&self, verification_id: &str, code: &str) -> DemoCredential {
        DemoCredential {
            verification_id: verification_id.to_string(),
            code: code.to_string(),
        }
    }

    async fn sign_in(&self, credential: DemoCredential) -> Result<(), ProviderError> {
        println!(
            "[provider] sign-in with credential for {}",
            credential.verification_id
        );
        if credential.code == DELIVERED_CODE {
            Ok(())
        } else {
            Err(ProviderError::InvalidCredentials)
        }
    }
}

/// Bridge that prints intents instead of switching screens
struct PrintingBridge;

impl NavigationBridge for PrintingBridge {
    fn dispatch(&self, intent: NavigationIntent) {
        match intent {
            NavigationIntent::NavigateToCodeEntry => println!("[nav] -> code entry screen"),
            NavigationIntent::NavigateToMain => println!("[nav] -> main screen"),
            NavigationIntent::StayWithError { message } => println!("[nav] stay: {}", message),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let controller = SessionController::new(
        Arc::new(DemoProvider {
            sends: AtomicUsize::new(0),
        }),
        Arc::new(PrintingBridge),
        AuthFlowConfig::default(),
    );

    let snapshot = controller.request_code("1", "5551234567").await?;
    println!("[session] {:?}", snapshot.state);

    // A mistyped code: the session returns to code entry for a retry
    let snapshot = controller.verify_code("000000").await?;
    println!(
        "[session] {:?} ({})",
        snapshot.state,
        snapshot.error_message.as_deref().unwrap_or("-")
    );

    // The user types the delivered code cell by cell
    let mut buffer = OtpInputBuffer::new();
    for c in DELIVERED_CODE.chars() {
        let index = buffer.cursor();
        buffer.set_digit(index, c);
    }

    let snapshot = controller.verify_code(&buffer.assembled_code()).await?;
    println!("[session] {:?}", snapshot.state);

    Ok(())
}
