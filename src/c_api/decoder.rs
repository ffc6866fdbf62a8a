use super::{c_to_string, size_t_to_usize};
use crate::{
    codes::ieee802_3an,
    decoder::{
        config::{ConfigurationProvider, ParameterList},
        factory::{DecoderImplementation, LdpcDecoder},
    },
};
use libc::size_t;
use log::error;
use std::{
    convert::TryFrom,
    error::Error,
    ffi::{c_char, c_void},
};

#[derive(Debug)]
struct Decoder {
    decoder: Box<dyn LdpcDecoder>,
}

impl Decoder {
    fn new(implementation: &str, options: &str) -> Result<Decoder, Box<dyn Error>> {
        let implementation: DecoderImplementation = implementation.parse()?;
        let params: ParameterList = options.parse()?;
        let decoder = implementation.build_decoder(ieee802_3an::code()?, params.configuration()?)?;
        Ok(Decoder { decoder })
    }

    fn configure(&mut self, options: &str) -> Result<(), Box<dyn Error>> {
        let params: ParameterList = options.parse()?;
        self.decoder.reconfigure(params.configuration()?)?;
        Ok(())
    }

    fn decode_f64(&mut self, output: &mut [u8], llrs: &[f64]) -> i32 {
        let report = match self.decoder.decode(llrs) {
            Ok(report) => report,
            Err(e) => {
                error!("ldpc_8023an_decoder: {e}");
                return -1;
            }
        };
        let len = output.len().min(report.codeword.len());
        output[..len].copy_from_slice(&report.codeword[..len]);
        if report.statistics.decoding_successful {
            i32::try_from(report.statistics.iterations_performed).unwrap_or(i32::MAX)
        } else {
            -1
        }
    }

    fn decode_f32(&mut self, output: &mut [u8], llrs: &[f32]) -> i32 {
        let llrs_f64 = llrs.iter().copied().map(f64::from).collect::<Vec<f64>>();
        self.decode_f64(output, &llrs_f64)
    }
}

#[no_mangle]
unsafe extern "C" fn ldpc_8023an_decoder_ctor(
    implementation: *const c_char,
    options: *const c_char,
) -> *mut c_void {
    let implementation = c_to_string(implementation);
    let options = c_to_string(options);
    match Decoder::new(&implementation, &options) {
        Ok(decoder) => Box::into_raw(Box::new(decoder)) as *mut c_void,
        Err(e) => {
            error!("ldpc_8023an_decoder_ctor: {e}");
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
unsafe extern "C" fn ldpc_8023an_decoder_dtor(decoder: *mut c_void) {
    drop(Box::from_raw(decoder as *mut Decoder));
}

#[no_mangle]
unsafe extern "C" fn ldpc_8023an_decoder_configure(
    decoder: *mut c_void,
    options: *const c_char,
) -> i32 {
    let options = c_to_string(options);
    let decoder = &mut *(decoder as *mut Decoder);
    match decoder.configure(&options) {
        Ok(()) => 0,
        Err(e) => {
            error!("ldpc_8023an_decoder_configure: {e}");
            -1
        }
    }
}

#[no_mangle]
unsafe extern "C" fn ldpc_8023an_decoder_decode_f64(
    decoder: *mut c_void,
    output: *mut u8,
    output_len: size_t,
    llrs: *const f64,
    llrs_len: size_t,
) -> i32 {
    let output = std::slice::from_raw_parts_mut(output, size_t_to_usize(output_len));
    let llrs = std::slice::from_raw_parts(llrs, size_t_to_usize(llrs_len));
    let decoder = &mut *(decoder as *mut Decoder);
    decoder.decode_f64(output, llrs)
}

#[no_mangle]
unsafe extern "C" fn ldpc_8023an_decoder_decode_f32(
    decoder: *mut c_void,
    output: *mut u8,
    output_len: size_t,
    llrs: *const f32,
    llrs_len: size_t,
) -> i32 {
    let output = std::slice::from_raw_parts_mut(output, size_t_to_usize(output_len));
    let llrs = std::slice::from_raw_parts(llrs, size_t_to_usize(llrs_len));
    let decoder = &mut *(decoder as *mut Decoder);
    decoder.decode_f32(output, llrs)
}
