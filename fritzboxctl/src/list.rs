use fritzbox::{DeviceHandle, DeviceInfo, DeviceStats, Session};
use prettytable::{format, Cell, Row, Table};

use crate::parser::StatKinds;

pub(crate) fn list(
    session: &Session,
    device: Option<&str>,
    kinds: Option<&StatKinds>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    if let Some(device) = device {
        let device = session.device(device)?;

        if kinds.is_none() {
            print_device_table(&[device.info(session)?]);
            println!();
        }
        let tables = device_detail_tables(session, &device, kinds, limit)?
            .into_iter()
            .map(|ea| ea.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        print!("{}", tables);

        return Ok(());
    }

    let devices = session.devices()?;
    info!("found {} devices", devices.len());
    print_device_table(&devices);

    Ok(())
}

fn create_table() -> Table {
    let mut table = Table::new();
    let fmt = format::FormatBuilder::new()
        .padding(1, 1)
        .separator(
            format::LinePosition::Title,
            format::LineSeparator::new('-', '+', '+', '+'),
        )
        .column_separator('|')
        .build();
    table.set_format(fmt);
    table
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

fn print_device_table(devices: &[DeviceInfo]) {
    let mut table = create_table();
    table.set_titles(Row::new(
        ["ain", "product", "name", "present", "state", "features"]
            .iter()
            .map(|title| Cell::new_align(title, format::Alignment::CENTER))
            .collect(),
    ));

    for device in devices {
        table.add_row(Row::new(vec![
            Cell::new(&device.ain),
            Cell::new(&device.productname),
            Cell::new(&device.name),
            Cell::new(&device.present.to_string()),
            Cell::new(&device.switch.state.to_string()),
            Cell::new(&device.capabilities.to_string()),
        ]));
    }
    table.printstd();
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

fn device_detail_tables(
    session: &Session,
    device: &DeviceHandle,
    kinds: Option<&StatKinds>,
    limit: Option<usize>,
) -> anyhow::Result<Vec<Table>> {
    Ok(device
        .basic_device_stats(session)?
        .into_iter()
        .filter(|stat| kinds.map_or(true, |kinds| kinds.0.contains(&stat.kind)))
        .map(|stat| {
            let mut table = create_table();
            table.set_titles(Row::new(vec![
                Cell::new_align("time", format::Alignment::CENTER),
                Cell::new_align(&stat.kind.to_string(), format::Alignment::CENTER),
            ]));
            add_stat_rows(&mut table, &stat, limit);
            table
        })
        .collect())
}

fn add_stat_rows(table: &mut Table, stat: &DeviceStats, limit: Option<usize>) {
    let now = chrono::Local::now();
    for values in &stat.values {
        let mut time = now;
        for (n, val) in values.values.iter().enumerate() {
            if matches!(limit, Some(limit) if n >= limit) {
                break;
            }
            table.add_row(Row::new(vec![
                Cell::new(&time.format("%Y-%m-%d %H:%M:%S").to_string()),
                Cell::new_align(&format!("{:.1}", val), format::Alignment::RIGHT),
            ]));
            time = time - chrono::Duration::seconds(values.grid as i64);
        }
    }
}
