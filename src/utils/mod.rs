pub(crate) mod hook;
pub(crate) mod timezone;

pub(crate) use hook::run_on_change;
pub(crate) use timezone::Timezone;
