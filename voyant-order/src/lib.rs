pub mod earnings;
pub mod flows;
pub mod models;
pub mod payment;
pub mod receipt;
pub mod wizard;

pub use earnings::OrganizerEarnings;
pub use flows::{CarFlow, FlightFlow, HotelFlow, PackageFlow, ProductFlow};
pub use models::{BookingDraft, NavigationState};
pub use payment::{CardDetails, PaymentReceipt, PaymentStep, PaymentStepError, PaymentStepState};
pub use receipt::{CustomerDetails, ReceiptModel, ReceiptView};
pub use wizard::{BookingWizard, WizardError, WizardStep};
