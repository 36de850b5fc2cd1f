fn main() {
    if let Err(err) = album_collage::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
