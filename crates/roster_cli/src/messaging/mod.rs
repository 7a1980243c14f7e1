mod campaign;
mod delivery;
mod template;

pub use campaign::{render_all, resolve_recipients, CampaignFile, RenderedMessage};
pub use delivery::{send_all, Delivery, DeliveryOutcome, DeliveryReport};
pub use template::MessageTemplate;
