fn main() {
    well_depth_log::cli::run();
}
