//! Log setup: timestamped lines to stdout and, when the data directory is
//! writable, to `<data_dir>/pointswarm/latest.log`.

use log::LevelFilter;

pub fn init(level: &str) -> Result<(), fern::InitError> {
    let level = level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    if let Some(dir) = dirs::data_dir().map(|dir| dir.join("pointswarm"))
        && std::fs::create_dir_all(&dir).is_ok()
    {
        dispatch = dispatch.chain(fern::log_file(dir.join("latest.log"))?);
    }

    dispatch.apply()?;
    Ok(())
}
