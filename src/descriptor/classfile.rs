//! Minimal class-file reader that pulls the module name out of a compiled
//! module descriptor (`module-info.class`).
//!
//! Only the constant pool and the top-level `Module` attribute are decoded;
//! everything else is skipped by length. All multi-byte values are
//! big-endian per the class-file format.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};

const CLASS_MAGIC: u32 = 0xCAFE_BABE;

const CONST_UTF8: u8 = 1;
const CONST_INTEGER: u8 = 3;
const CONST_FLOAT: u8 = 4;
const CONST_LONG: u8 = 5;
const CONST_DOUBLE: u8 = 6;
const CONST_CLASS: u8 = 7;
const CONST_STRING: u8 = 8;
const CONST_FIELDREF: u8 = 9;
const CONST_METHODREF: u8 = 10;
const CONST_INTERFACE_METHODREF: u8 = 11;
const CONST_NAME_AND_TYPE: u8 = 12;
const CONST_METHOD_HANDLE: u8 = 15;
const CONST_METHOD_TYPE: u8 = 16;
const CONST_DYNAMIC: u8 = 17;
const CONST_INVOKE_DYNAMIC: u8 = 18;
const CONST_MODULE: u8 = 19;
const CONST_PACKAGE: u8 = 20;

/// Extract the declared module name from `module-info.class` bytes.
pub fn module_name(bytes: &[u8]) -> Result<String> {
    let mut r = Reader::new(bytes);

    if r.u4()? != CLASS_MAGIC {
        bail!("not a class file (bad magic)");
    }
    r.skip(4)?; // minor + major version

    let pool = ConstantPool::read(&mut r)?;

    r.skip(6)?; // access_flags, this_class, super_class
    let interfaces = r.u2()? as usize;
    r.skip(interfaces * 2)?;
    skip_members(&mut r)?; // fields
    skip_members(&mut r)?; // methods

    let attributes = r.u2()?;
    for _ in 0..attributes {
        let name_index = r.u2()?;
        let length = r.u4()? as usize;
        if pool.utf8(name_index) == Some("Module") {
            // Module_attribute starts with module_name_index, a
            // CONSTANT_Module entry pointing at the Utf8 name.
            let module_index = r.u2()?;
            let name_index = pool
                .module(module_index)
                .context("Module attribute references a missing constant")?;
            return pool
                .utf8(name_index)
                .map(str::to_owned)
                .context("module name constant is not a Utf8 entry");
        }
        r.skip(length)?;
    }

    bail!("no Module attribute present");
}

/// The slices of the constant pool the lookup needs: Utf8 text and
/// CONSTANT_Module name indices. Everything else is skipped.
struct ConstantPool {
    utf8: HashMap<u16, String>,
    modules: HashMap<u16, u16>,
}

impl ConstantPool {
    fn read(r: &mut Reader) -> Result<Self> {
        let count = r.u2()?;
        let mut utf8 = HashMap::new();
        let mut modules = HashMap::new();

        let mut index: u16 = 1;
        while index < count {
            let tag = r.u1()?;
            match tag {
                CONST_UTF8 => {
                    let len = r.u2()? as usize;
                    let text = String::from_utf8_lossy(r.bytes(len)?).into_owned();
                    utf8.insert(index, text);
                }
                CONST_MODULE => {
                    let name_index = r.u2()?;
                    modules.insert(index, name_index);
                }
                CONST_CLASS | CONST_STRING | CONST_METHOD_TYPE | CONST_PACKAGE => r.skip(2)?,
                CONST_METHOD_HANDLE => r.skip(3)?,
                CONST_INTEGER | CONST_FLOAT | CONST_FIELDREF | CONST_METHODREF
                | CONST_INTERFACE_METHODREF | CONST_NAME_AND_TYPE | CONST_DYNAMIC
                | CONST_INVOKE_DYNAMIC => r.skip(4)?,
                CONST_LONG | CONST_DOUBLE => {
                    // 8-byte constants occupy two pool slots.
                    r.skip(8)?;
                    index += 1;
                }
                other => bail!("unknown constant pool tag {other}"),
            }
            index += 1;
        }

        Ok(Self { utf8, modules })
    }

    fn utf8(&self, index: u16) -> Option<&str> {
        self.utf8.get(&index).map(String::as_str)
    }

    fn module(&self, index: u16) -> Option<u16> {
        self.modules.get(&index).copied()
    }
}

/// Skip a fields[] or methods[] table including nested attributes.
fn skip_members(r: &mut Reader) -> Result<()> {
    let count = r.u2()?;
    for _ in 0..count {
        r.skip(6)?; // access_flags, name_index, descriptor_index
        let attributes = r.u2()?;
        for _ in 0..attributes {
            r.skip(2)?; // attribute_name_index
            let length = r.u4()? as usize;
            r.skip(length)?;
        }
    }
    Ok(())
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.bytes.len());
        match end {
            Some(end) => {
                let slice = &self.bytes[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => bail!("truncated class file"),
        }
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        self.bytes(n).map(|_| ())
    }

    fn u1(&mut self) -> Result<u8> {
        Ok(self.bytes(1)?[0])
    }

    fn u2(&mut self) -> Result<u16> {
        let b = self.bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u4(&mut self) -> Result<u32> {
        let b = self.bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}
