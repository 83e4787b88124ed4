use std::path::Path;

use numframe::tutorial;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    tutorial::arrays::run()?;
    tutorial::tables::run(Path::new("."))?;
    Ok(())
}
