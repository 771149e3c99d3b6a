pub mod card_panel;
pub mod dashboard;
pub mod search_bar;
pub mod welcome;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use card_panel::{CARD_HEIGHT, CardPanel, CardPanelProps};
pub use dashboard::{Dashboard, DashboardProps, ERROR_ICON, SPINNERS};
pub use search_bar::{SEARCH_PLACEHOLDER, SearchBar, SearchBarProps};
pub use welcome::{WELCOME_HINT, WELCOME_TITLE, Welcome};
