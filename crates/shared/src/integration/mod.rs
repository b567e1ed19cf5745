mod cloudinary;
mod disabled;
mod google;
mod groq;
mod mailer;
mod midtrans;

pub use self::cloudinary::{CloudinaryStorage, upload_signature};
pub use self::disabled::Disabled;
pub use self::google::GoogleOAuth;
pub use self::groq::{GroqProvider, StreamEvent, parse_stream_line};
pub use self::mailer::{LogMailer, SmtpMailer, templates};
pub use self::midtrans::{MidtransGateway, map_transaction_status, notification_signature};

use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    abstract_trait::{
        DynChatProvider, DynMailer, DynMediaStorage, DynOAuthProvider, DynPaymentGateway,
    },
    config::Config,
    utils::AppError,
};

/// Third-party clients chosen from configuration.
#[derive(Clone)]
pub struct Integrations {
    pub chat: DynChatProvider,
    pub payment_gateway: DynPaymentGateway,
    pub media_storage: DynMediaStorage,
    pub oauth: DynOAuthProvider,
    pub mailer: DynMailer,
}

impl Integrations {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let chat: DynChatProvider = match &config.groq {
            Some(groq) => Arc::new(GroqProvider::new(groq)?),
            None => {
                warn!("GROQ_API_KEY not set, AI chat disabled");
                Arc::new(Disabled::new("AI chat"))
            }
        };

        let payment_gateway: DynPaymentGateway = match &config.midtrans {
            Some(midtrans) => Arc::new(MidtransGateway::new(midtrans)?),
            None => {
                warn!("MIDTRANS_SERVER_KEY not set, payments disabled");
                Arc::new(Disabled::new("Payment gateway"))
            }
        };

        let media_storage: DynMediaStorage = match &config.cloudinary {
            Some(cloudinary) => Arc::new(CloudinaryStorage::new(cloudinary)?),
            None => {
                warn!("Cloudinary not configured, avatar uploads disabled");
                Arc::new(Disabled::new("Image upload"))
            }
        };

        let oauth: DynOAuthProvider = match &config.google {
            Some(google) => Arc::new(GoogleOAuth::new(google)?),
            None => {
                warn!("Google OAuth not configured, Google sign-in disabled");
                Arc::new(Disabled::new("Google sign-in"))
            }
        };

        let mailer: DynMailer = match &config.smtp {
            Some(smtp) => {
                info!("Using SMTP relay {}:{}", smtp.host, smtp.port);
                Arc::new(SmtpMailer::new(smtp)?)
            }
            None => {
                warn!("SMTP not configured, emails will be logged");
                Arc::new(LogMailer)
            }
        };

        Ok(Self {
            chat,
            payment_gateway,
            media_storage,
            oauth,
            mailer,
        })
    }
}
