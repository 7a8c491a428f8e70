fn main() -> Result<(), eframe::Error> {
    playto_frontend::run_frontend()
}
