pub mod colors;
mod menu_bar;
mod page_view;
pub mod sidebar;
mod status_bar;
mod tab_bar;
mod terminal_view;
mod tree_view;

pub use menu_bar::MenuBar;
pub use page_view::PageView;
pub use sidebar::{PanelId, Sidebar, SidebarState, ACTIVITY_BAR_WIDTH, SIDEBAR_HEADER_ROWS};
pub use status_bar::{Notice, NoticeLevel, StatusBar};
pub use tab_bar::{TabBar, TabBarHitTarget};
pub use terminal_view::TerminalView;
pub use tree_view::{TreeView, TreeViewState};
