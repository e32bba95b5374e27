mod composer;
mod session_sidebar;
mod transcript;

pub use composer::Composer;
pub use session_sidebar::SessionSidebar;
pub use transcript::Transcript;
