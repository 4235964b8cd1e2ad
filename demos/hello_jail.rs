use std::io::{Read, Write};

use jail_fs::{ErrorKind, JailFS, WriteMode};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let root = std::env::temp_dir().join("hello_jail");
    std::fs::create_dir_all(&root)?;
    println!("Jail root: {}", root.display());

    // a session starts at the virtual root `/`
    let mut fs = JailFS::new(&root)?;

    // creates `<tmp>/hello_jail/docs` on the host
    if !fs.exists("/docs") {
        fs.mkdir("/docs")?;
    }
    fs.chdir("docs")?;

    // relative and absolute names are both looked up under the cwd `/docs`
    fs.write("first.txt", WriteMode::Truncate)?.write_all(b"Hello")?;
    fs.write("/first.txt", WriteMode::Append)?.write_all(b", World")?;

    let mut content = String::new();
    fs.read("first.txt")?.read_to_string(&mut content)?;
    println!("{content}!");

    // hostile paths are folded back into the jail
    println!(
        "..\\..\\etc\\passwd resolves to {}",
        fs.resolve("..\\..\\etc\\passwd")?.display()
    );

    // a failed chdir leaves the cwd alone
    fs.write("report.txt", WriteMode::Truncate)?;
    let err = fs.chdir("report.txt").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDirectory);
    println!("{err}, still in {}", fs.current_directory());

    for entry in fs.list(".")? {
        println!("{:>8} {}", entry.len(), entry.name());
    }

    let upload = fs.unique_name();
    fs.rename("report.txt", &upload)?;
    println!("report.txt renamed to {upload}");

    fs.delete(&upload)?;
    fs.delete("first.txt")?;
    fs.chdir("..")?;
    fs.delete("docs")?;

    Ok(())
}
