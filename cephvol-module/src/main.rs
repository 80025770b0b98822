fn main() -> anyhow::Result<()> {
    let code = cephvol_module::run()?;
    std::process::exit(code);
}
