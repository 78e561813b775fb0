//! Profile screen state resolution.
//!
//! - [`ProfileOrchestrator`]: profile → schools → clubs, race-free
//! - [`derive_view`]: pure display values for the profile header
//! - [`LogoutAction`]: guarded remote-then-local logout

pub mod liveness;
pub mod logout;
pub mod orchestrator;
pub mod state;
pub mod view;

pub use liveness::{Liveness, Scope};
pub use logout::{Host, LoggedOutCallback, LogoutAction, LogoutOutcome};
pub use orchestrator::ProfileOrchestrator;
pub use state::{ClubsKey, ProfileScreenState, Resolution};
pub use view::{NO_AFFILIATION, PROFILE_FETCH_FAILED, ProfileView, derive_view, role_label};
