// ABOUTME: UI components for the TUI interface including header, popup stack, and help

pub mod header;
pub mod help;
pub mod layout;
pub mod popup_stack;

pub use header::HeaderComponent;
pub use help::HelpComponent;
pub use layout::LayoutComponent;
pub use popup_stack::PopupStackComponent;
