mod checkbox;
mod header;
mod loading;
mod server_list;
mod toolbar;

pub use checkbox::Checkbox;
pub use header::Header;
pub use loading::Loading;
pub use server_list::ServerList;
pub use toolbar::Toolbar;
