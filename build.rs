use anyhow::Result;
use vergen::EmitBuilder;

// Exposes VERGEN_GIT_SHA to the CLI version string. Outside a git checkout
// vergen falls back to placeholder output instead of failing the build.
fn main() -> Result<()> {
    EmitBuilder::builder().git_sha(true).emit()?;
    Ok(())
}
