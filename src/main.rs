fn main() {
    if let Err(err) = graph_svg_writer::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
