// src/commands/mod.rs
pub mod add;
pub mod cat;
pub mod cd;
pub mod compress;
pub mod cp;
pub mod hash;
pub mod help_cmd;
pub mod ls;
pub mod mv;
pub mod registry;
pub mod rm;
pub mod rn;
pub mod types;

pub use registry::{create_default_registry, CommandRegistry};
pub use types::{Command, CommandContext, CommandError, Output};

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Command, CommandContext, CommandError};
    use crate::fs::PathResolver;
    use tempfile::TempDir;

    /// base/
    ///   docs/readme.txt
    ///   dest/
    ///   notes.txt
    pub async fn fixture() -> (TempDir, PathResolver) {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("docs")).unwrap();
        std::fs::create_dir(tmp.path().join("dest")).unwrap();
        std::fs::write(tmp.path().join("docs").join("readme.txt"), "read me\n").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "some notes\n").unwrap();
        let resolver = PathResolver::open(tmp.path()).await.unwrap();
        (tmp, resolver)
    }

    pub async fn run(
        cmd: &dyn Command,
        resolver: &mut PathResolver,
        args: &[&str],
    ) -> (Result<(), CommandError>, String) {
        let mut out: Vec<u8> = Vec::new();
        let ctx = CommandContext {
            args: args.iter().map(|s| s.to_string()).collect(),
            resolver,
            stdout: &mut out,
        };
        let result = cmd.execute(ctx).await;
        (result, String::from_utf8(out).unwrap())
    }
}
