//! # 元素周期表
//!
//! 元素符号、名称与标准原子量 (u)，按原子序数排列。
//!
//! ## 依赖关系
//! - 被 `models/structure.rs`（校验、密度）和 `symmetry/`（原子序数）使用
//! - 纯静态数据，无外部依赖

/// 元素数据：(符号, 名称, 原子量)
pub struct Element {
    pub symbol: &'static str,
    pub name: &'static str,
    pub mass: f64,
}

const fn el(symbol: &'static str, name: &'static str, mass: f64) -> Element {
    Element { symbol, name, mass }
}

/// 周期表，下标 = 原子序数 - 1
pub static ELEMENTS: [Element; 118] = [
    el("H", "Hydrogen", 1.008),
    el("He", "Helium", 4.0026),
    el("Li", "Lithium", 6.94),
    el("Be", "Beryllium", 9.0122),
    el("B", "Boron", 10.81),
    el("C", "Carbon", 12.011),
    el("N", "Nitrogen", 14.007),
    el("O", "Oxygen", 15.999),
    el("F", "Fluorine", 18.998),
    el("Ne", "Neon", 20.180),
    el("Na", "Sodium", 22.990),
    el("Mg", "Magnesium", 24.305),
    el("Al", "Aluminium", 26.982),
    el("Si", "Silicon", 28.085),
    el("P", "Phosphorus", 30.974),
    el("S", "Sulfur", 32.06),
    el("Cl", "Chlorine", 35.45),
    el("Ar", "Argon", 39.948),
    el("K", "Potassium", 39.098),
    el("Ca", "Calcium", 40.078),
    el("Sc", "Scandium", 44.956),
    el("Ti", "Titanium", 47.867),
    el("V", "Vanadium", 50.942),
    el("Cr", "Chromium", 51.996),
    el("Mn", "Manganese", 54.938),
    el("Fe", "Iron", 55.845),
    el("Co", "Cobalt", 58.933),
    el("Ni", "Nickel", 58.693),
    el("Cu", "Copper", 63.546),
    el("Zn", "Zinc", 65.38),
    el("Ga", "Gallium", 69.723),
    el("Ge", "Germanium", 72.630),
    el("As", "Arsenic", 74.922),
    el("Se", "Selenium", 78.971),
    el("Br", "Bromine", 79.904),
    el("Kr", "Krypton", 83.798),
    el("Rb", "Rubidium", 85.468),
    el("Sr", "Strontium", 87.62),
    el("Y", "Yttrium", 88.906),
    el("Zr", "Zirconium", 91.224),
    el("Nb", "Niobium", 92.906),
    el("Mo", "Molybdenum", 95.95),
    el("Tc", "Technetium", 98.0),
    el("Ru", "Ruthenium", 101.07),
    el("Rh", "Rhodium", 102.91),
    el("Pd", "Palladium", 106.42),
    el("Ag", "Silver", 107.87),
    el("Cd", "Cadmium", 112.41),
    el("In", "Indium", 114.82),
    el("Sn", "Tin", 118.71),
    el("Sb", "Antimony", 121.76),
    el("Te", "Tellurium", 127.60),
    el("I", "Iodine", 126.90),
    el("Xe", "Xenon", 131.29),
    el("Cs", "Caesium", 132.91),
    el("Ba", "Barium", 137.33),
    el("La", "Lanthanum", 138.91),
    el("Ce", "Cerium", 140.12),
    el("Pr", "Praseodymium", 140.91),
    el("Nd", "Neodymium", 144.24),
    el("Pm", "Promethium", 145.0),
    el("Sm", "Samarium", 150.36),
    el("Eu", "Europium", 151.96),
    el("Gd", "Gadolinium", 157.25),
    el("Tb", "Terbium", 158.93),
    el("Dy", "Dysprosium", 162.50),
    el("Ho", "Holmium", 164.93),
    el("Er", "Erbium", 167.26),
    el("Tm", "Thulium", 168.93),
    el("Yb", "Ytterbium", 173.05),
    el("Lu", "Lutetium", 174.97),
    el("Hf", "Hafnium", 178.49),
    el("Ta", "Tantalum", 180.95),
    el("W", "Tungsten", 183.84),
    el("Re", "Rhenium", 186.21),
    el("Os", "Osmium", 190.23),
    el("Ir", "Iridium", 192.22),
    el("Pt", "Platinum", 195.08),
    el("Au", "Gold", 196.97),
    el("Hg", "Mercury", 200.59),
    el("Tl", "Thallium", 204.38),
    el("Pb", "Lead", 207.2),
    el("Bi", "Bismuth", 208.98),
    el("Po", "Polonium", 209.0),
    el("At", "Astatine", 210.0),
    el("Rn", "Radon", 222.0),
    el("Fr", "Francium", 223.0),
    el("Ra", "Radium", 226.0),
    el("Ac", "Actinium", 227.0),
    el("Th", "Thorium", 232.04),
    el("Pa", "Protactinium", 231.04),
    el("U", "Uranium", 238.03),
    el("Np", "Neptunium", 237.0),
    el("Pu", "Plutonium", 244.0),
    el("Am", "Americium", 243.0),
    el("Cm", "Curium", 247.0),
    el("Bk", "Berkelium", 247.0),
    el("Cf", "Californium", 251.0),
    el("Es", "Einsteinium", 252.0),
    el("Fm", "Fermium", 257.0),
    el("Md", "Mendelevium", 258.0),
    el("No", "Nobelium", 259.0),
    el("Lr", "Lawrencium", 266.0),
    el("Rf", "Rutherfordium", 267.0),
    el("Db", "Dubnium", 268.0),
    el("Sg", "Seaborgium", 269.0),
    el("Bh", "Bohrium", 270.0),
    el("Hs", "Hassium", 277.0),
    el("Mt", "Meitnerium", 278.0),
    el("Ds", "Darmstadtium", 281.0),
    el("Rg", "Roentgenium", 282.0),
    el("Cn", "Copernicium", 285.0),
    el("Nh", "Nihonium", 286.0),
    el("Fl", "Flerovium", 289.0),
    el("Mc", "Moscovium", 290.0),
    el("Lv", "Livermorium", 293.0),
    el("Ts", "Tennessine", 294.0),
    el("Og", "Oganesson", 294.0),
];

/// 元素符号 -> 原子序数
pub fn atomic_number(symbol: &str) -> Option<u32> {
    ELEMENTS
        .iter()
        .position(|e| e.symbol == symbol)
        .map(|i| i as u32 + 1)
}

/// 原子序数 -> 元素符号
pub fn symbol(z: u32) -> Option<&'static str> {
    if z == 0 {
        return None;
    }
    ELEMENTS.get(z as usize - 1).map(|e| e.symbol)
}

/// 原子量 (u)
pub fn atomic_mass(symbol: &str) -> Option<f64> {
    ELEMENTS.iter().find(|e| e.symbol == symbol).map(|e| e.mass)
}

/// 元素全称
pub fn element_name(symbol: &str) -> Option<&'static str> {
    ELEMENTS.iter().find(|e| e.symbol == symbol).map(|e| e.name)
}

pub fn is_valid_symbol(symbol: &str) -> bool {
    atomic_number(symbol).is_some()
}

/// 规范化大小写: "au" / "AU" -> "Au"
///
/// 同时去掉 CASTEP/CIF 标签中常见的数字后缀，如 "Fe1" -> "Fe"。
pub fn normalize_symbol(raw: &str) -> String {
    let letters: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    let mut chars = letters.chars();
    match chars.next() {
        Some(first) => {
            let mut s = first.to_ascii_uppercase().to_string();
            s.extend(chars.map(|c| c.to_ascii_lowercase()));
            s
        }
        None => String::new(),
    }
}
