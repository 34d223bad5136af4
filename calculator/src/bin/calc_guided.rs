use std::io;

fn main() -> anyhow::Result<()> {
    calculator::init_logging();
    calculator::guided::run(io::stdin().lock(), &mut io::stdout().lock())?;
    Ok(())
}
