use tessel_demo::DemoVariant;

fn main() {
    std::process::exit(tessel_demo::run(DemoVariant::Solid));
}
