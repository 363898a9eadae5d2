use anyhow::Result;
use std::path::Path;

pub fn run(root: &Path, port: u16) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let root_buf = root.to_path_buf();

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!(
            "Serving {} on http://localhost:{actual_port}",
            root_buf.display()
        );

        tokio::select! {
            res = tdd_server::serve_on(root_buf, listener) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
