use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=ico/app.ico");

    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }

    let icon_path = "ico/app.ico";
    if !Path::new(icon_path).is_file() {
        println!("cargo:warning=No icon found at {icon_path}; exe icon resource not set");
        return;
    }

    let mut res = winres::WindowsResource::new();
    res.set_icon(icon_path);
    res.set("ProductName", "Custom Taskbar");
    res.set("FileDescription", "Custom Taskbar");
    res.set("OriginalFilename", "custom_taskbar.exe");
    res.set("InternalName", "custom_taskbar");
    if let Err(err) = res.compile() {
        panic!("failed to compile Windows resource icon from {icon_path}: {err}");
    }
}
