use std::collections::HashSet;

use fritzbox::DeviceStatsKind;

#[derive(Debug, Clone)]
pub(crate) struct StatKinds(pub(crate) HashSet<DeviceStatsKind>);

pub(crate) fn parse_kinds(arg: &str) -> Result<StatKinds, String> {
    arg.split(',')
        .map(|ea| ea.trim().parse())
        .collect::<Result<HashSet<_>, _>>()
        .map(StatKinds)
}
