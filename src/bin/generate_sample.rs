use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Weighted choice over `(value, weight)` pairs.
fn pick<'a>(options: &[(&'a str, u32)], rng: &mut StdRng) -> &'a str {
    options
        .choose_weighted(rng, |&(_, w)| w)
        .map(|&(v, _)| v)
        .unwrap_or(options[0].0)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(42);

    let protocols = [("tcp", 80), ("udp", 12), ("icmp", 8)];
    let tcp_services = [("http", 50), ("smtp", 15), ("ftp_data", 10), ("private", 15), ("telnet", 10)];
    let udp_services = [("domain_u", 60), ("private", 30), ("ntp_u", 10)];
    let icmp_services = [("ecr_i", 70), ("eco_i", 20), ("urp_i", 10)];
    let flags = [("SF", 75), ("S0", 15), ("REJ", 10)];

    let n_rows = 1000;
    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record([
        "duration",
        "protocol_type",
        "service",
        "flag",
        "src_bytes",
        "dst_bytes",
        "label",
    ])?;

    for _ in 0..n_rows {
        let protocol = pick(&protocols, &mut rng);
        let service = match protocol {
            "tcp" => pick(&tcp_services, &mut rng),
            "udp" => pick(&udp_services, &mut rng),
            _ => pick(&icmp_services, &mut rng),
        };
        let flag = if protocol == "tcp" {
            pick(&flags, &mut rng)
        } else {
            "SF"
        };
        let attack = flag != "SF" || rng.gen_bool(0.05);
        let duration: u32 = if protocol == "tcp" { rng.gen_range(0..300) } else { 0 };
        let src_bytes: u32 = rng.gen_range(0..5000);
        let dst_bytes: u32 = if attack { 0 } else { rng.gen_range(0..20000) };
        // A few gaps so missing-value handling is exercised.
        let duration = if rng.gen_bool(0.01) {
            String::new()
        } else {
            duration.to_string()
        };

        writer.write_record([
            duration,
            protocol.to_string(),
            service.to_string(),
            flag.to_string(),
            src_bytes.to_string(),
            dst_bytes.to_string(),
            if attack { "attack" } else { "normal" }.to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {n_rows} connection records to {output_path}");
    Ok(())
}
