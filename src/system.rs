use crate::error::Result;
use crate::geometry::MonitorRect;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// What the autostart entry launches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupTarget {
    pub executable: PathBuf,
    pub working_dir: PathBuf,
    pub icon: PathBuf,
}

impl StartupTarget {
    pub fn current() -> Result<Self> {
        let executable = std::env::current_exe()?;
        let working_dir = executable
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(Self {
            icon: executable.clone(),
            executable,
            working_dir,
        })
    }
}

/// Creates the autostart entry unless one already exists. Returns whether a
/// new entry was written.
pub fn ensure_startup_shortcut(shortcut: &Path, target: &StartupTarget) -> Result<bool> {
    if shortcut.exists() {
        return Ok(false);
    }
    if let Some(dir) = shortcut.parent() {
        std::fs::create_dir_all(dir)?;
    }
    write_startup_entry(shortcut, target)?;
    info!(
        "Created startup shortcut {} -> {}",
        shortcut.display(),
        target.executable.display()
    );
    Ok(true)
}

pub fn open_url(url: &str) {
    if let Err(err) = open::that_detached(url) {
        warn!("Failed to open {url}: {err}");
    }
}

#[cfg(windows)]
fn to_wide(value: &std::ffi::OsStr) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;
    value.encode_wide().chain(std::iter::once(0)).collect()
}

#[cfg(windows)]
fn write_startup_entry(shortcut: &Path, target: &StartupTarget) -> Result<()> {
    use crate::error::AppError;
    use windows::core::{Interface, PCWSTR};
    use windows::Win32::Foundation::TRUE;
    use windows::Win32::System::Com::{
        CoCreateInstance, CoInitializeEx, CoUninitialize, IPersistFile, CLSCTX_INPROC_SERVER,
        COINIT_APARTMENTTHREADED,
    };
    use windows::Win32::UI::Shell::{IShellLinkW, ShellLink};

    let shortcut_error = |err: windows::core::Error| AppError::Shortcut(err.to_string());

    unsafe {
        let com_initialized = CoInitializeEx(None, COINIT_APARTMENTTHREADED).is_ok();

        let result = (|| {
            let shell_link: IShellLinkW =
                CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER).map_err(shortcut_error)?;

            let exe_wide = to_wide(target.executable.as_os_str());
            let workdir_wide = to_wide(target.working_dir.as_os_str());
            let icon_wide = to_wide(target.icon.as_os_str());
            shell_link
                .SetPath(PCWSTR(exe_wide.as_ptr()))
                .map_err(shortcut_error)?;
            shell_link
                .SetWorkingDirectory(PCWSTR(workdir_wide.as_ptr()))
                .map_err(shortcut_error)?;
            shell_link
                .SetIconLocation(PCWSTR(icon_wide.as_ptr()), 0)
                .map_err(shortcut_error)?;

            let persist_file: IPersistFile = shell_link.cast().map_err(shortcut_error)?;
            let shortcut_wide = to_wide(shortcut.as_os_str());
            persist_file
                .Save(PCWSTR(shortcut_wide.as_ptr()), TRUE)
                .map_err(shortcut_error)
        })();

        if com_initialized {
            CoUninitialize();
        }
        result
    }
}

#[cfg(not(windows))]
fn write_startup_entry(shortcut: &Path, target: &StartupTarget) -> Result<()> {
    std::fs::write(shortcut, desktop_entry(target))?;
    Ok(())
}

#[cfg(not(windows))]
fn desktop_entry(target: &StartupTarget) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name={name}\n\
         Exec=\"{exec}\"\n\
         Path={path}\n\
         Icon={icon}\n\
         X-GNOME-Autostart-enabled=true\n",
        name = crate::branding::APP_DISPLAY_NAME,
        exec = target.executable.display(),
        path = target.working_dir.display(),
        icon = target.icon.display(),
    )
}

/// Physical-pixel bounds of every attached monitor, primary first.
#[cfg(windows)]
pub fn monitors() -> Vec<MonitorRect> {
    use windows::Win32::Foundation::{BOOL, LPARAM, RECT, TRUE};
    use windows::Win32::Graphics::Gdi::{
        EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO, MONITORINFOF_PRIMARY,
    };

    unsafe extern "system" fn collect(
        hmonitor: HMONITOR,
        _hdc: HDC,
        _clip: *mut RECT,
        data: LPARAM,
    ) -> BOOL {
        let found = &mut *(data.0 as *mut Vec<(bool, MonitorRect)>);
        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        if GetMonitorInfoW(hmonitor, &mut info).as_bool() {
            let r = info.rcMonitor;
            found.push((
                info.dwFlags & MONITORINFOF_PRIMARY != 0,
                MonitorRect {
                    x: r.left,
                    y: r.top,
                    width: r.right - r.left,
                    height: r.bottom - r.top,
                },
            ));
        }
        TRUE
    }

    let mut found: Vec<(bool, MonitorRect)> = Vec::new();
    unsafe {
        let _ = EnumDisplayMonitors(
            None,
            None,
            Some(collect),
            LPARAM(&mut found as *mut Vec<(bool, MonitorRect)> as isize),
        );
    }
    found.sort_by_key(|(primary, _)| !*primary);
    found.into_iter().map(|(_, rect)| rect).collect()
}

#[cfg(not(windows))]
pub fn monitors() -> Vec<MonitorRect> {
    Vec::new()
}
