fn main() -> anyhow::Result<()> {
    // `--invoke <TICKER>` runs a single dispatch against the live providers
    // and prints the response body instead of starting the server.
    let args: Vec<String> = std::env::args().collect();
    let invoke = args
        .iter()
        .position(|a| a == "--invoke")
        .map(|i| args.get(i + 1).cloned().unwrap_or_default());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match invoke {
        Some(ticker) => runtime.block_on(api_server::invoke_once(&ticker)),
        None => runtime.block_on(api_server::run_server()),
    }
}
