fn main() -> Result<(), Box<dyn std::error::Error>> {
    kawaii_player::runtime::run()
}
