mod command;
mod schema;
mod util;

fn main() -> anyhow::Result<()> {
    init_tracing();
    command::run()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
