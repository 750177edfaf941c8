/// Example program to print the loaded configuration
///
/// Run with: cargo run -p glide-config --example print_config

fn main() {
    // Load configuration from glide.toml
    let config = glide_config::GlideConfig::load();

    println!("=== Glide Configuration ===\n");

    println!("Timing Settings:");
    println!("  Duration (ms): {}", config.timing.duration_ms);
    println!("  Easing: {:?}", config.timing.easing);
    println!();

    println!("Easing Aliases:");
    for (alias, css) in &config.easing.aliases {
        println!("  {alias} => {css}");
    }
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
