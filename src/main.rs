use duoclock::console;

fn main() {
    env_logger::init();
    console::run();
}
