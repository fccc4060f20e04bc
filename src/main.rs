fn main() -> anyhow::Result<()> {
    tiled2console::run()
}
