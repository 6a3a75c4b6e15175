use fritzbox::{Session, SwitchState};

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SwitchAction {
    On,
    Off,
    Toggle,
    State,
}

pub fn switch(session: &Session, device: &str, action: SwitchAction) -> anyhow::Result<()> {
    let device = session.device(device)?;

    let state = match action {
        SwitchAction::On => device.switch_on(session)?,
        SwitchAction::Off => device.switch_off(session)?,
        SwitchAction::Toggle => device.switch_toggle(session)?,
        SwitchAction::State => device.switch_state(session)?,
    };

    info!("{:?} {} -> {}", action, device.ain(), state);
    match state {
        SwitchState::On => println!("{} is on", device),
        SwitchState::Off => println!("{} is off", device),
        SwitchState::Invalid => println!("{} is in an unknown state", device),
    }

    Ok(())
}
