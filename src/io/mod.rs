pub mod config_io;
pub mod desk_io;
pub mod fs;
pub mod state;
