use fritzbox::Session;

pub(crate) fn read(session: &Session, device: &str) -> anyhow::Result<()> {
    let device = session.device(device)?;
    let capabilities = device.capabilities();

    println!("{} ({}, {})", device, device.ain(), device.productname());
    println!("  present:     {}", device.present(session)?);
    if capabilities.has_temperature_sensor() {
        println!("  temperature: {:.1} °C", device.temperature(session)?);
    }
    if capabilities.has_energy_gauge() {
        println!("  power:       {:.2} W", device.power(session)?);
        println!("  energy:      {:.0} Wh", device.energy(session)?);
    }
    if capabilities.is_switchable() {
        println!("  switch:      {}", device.switch_state(session)?);
    }

    Ok(())
}
