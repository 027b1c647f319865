pub mod path;

pub use path::{
    basename, expand_tilde, normalize_path, parent_path, path_join, resolve_path, to_display_path,
};
