use std::io;

fn main() -> anyhow::Result<()> {
    calculator::init_logging();
    calculator::expression::run(io::stdin().lock(), &mut io::stdout().lock())?;
    Ok(())
}
